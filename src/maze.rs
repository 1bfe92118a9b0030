//! Grid model and the randomized depth-first carve.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_COLS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    /// Order the carve shuffles from: top, right, bottom, left.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    /// (row, col) offset.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Right => (0, 1),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Up => "up",
            Dir::Right => "right",
            Dir::Down => "down",
            Dir::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// `true` means the wall is standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Default for Walls {
    fn default() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

impl Walls {
    pub fn get(&self, dir: Dir) -> bool {
        match dir {
            Dir::Up => self.top,
            Dir::Right => self.right,
            Dir::Down => self.bottom,
            Dir::Left => self.left,
        }
    }

    fn clear(&mut self, dir: Dir) {
        match dir {
            Dir::Up => self.top = false,
            Dir::Right => self.right = false,
            Dir::Down => self.bottom = false,
            Dir::Left => self.left = false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub pos: Pos,
    pub walls: Walls,
    pub visited: bool,
}

impl Cell {
    fn new(pos: Pos) -> Self {
        Self {
            pos,
            walls: Walls::default(),
            visited: false,
        }
    }
}

/// Row-major arena of cells, every wall standing until carved.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(Pos::new(row, col)));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos.row * self.cols + pos.col]
    }

    fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        &mut self.cells[pos.row * self.cols + pos.col]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn has_wall(&self, pos: Pos, dir: Dir) -> bool {
        self.cell(pos).walls.get(dir)
    }

    /// Neighbouring cell in `dir`, if it lies on the grid.
    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = pos.row as isize + dr;
        let col = pos.col as isize + dc;
        if row < 0 || col < 0 {
            return None;
        }
        let next = Pos::new(row as usize, col as usize);
        self.contains(next).then_some(next)
    }

    /// Clears the wall on both sides of the shared edge.
    fn carve(&mut self, pos: Pos, dir: Dir, next: Pos) {
        self.cell_mut(pos).walls.clear(dir);
        self.cell_mut(next).walls.clear(dir.opposite());
    }

    /// Clears a single side without touching the neighbour.
    #[cfg(test)]
    pub(crate) fn knock_out(&mut self, pos: Pos, dir: Dir) {
        self.cell_mut(pos).walls.clear(dir);
    }

    /// Number of carved edges, each counted once.
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| usize::from(!cell.walls.right) + usize::from(!cell.walls.bottom))
            .sum()
    }
}

struct Frame {
    pos: Pos,
    dirs: [Dir; 4],
    next: usize,
}

impl Frame {
    fn enter(grid: &mut Grid, pos: Pos, rng: &mut impl Rng) -> Self {
        grid.cell_mut(pos).visited = true;
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        Self { pos, dirs, next: 0 }
    }
}

/// Carves a perfect maze into `grid`, rooted at `start`.
///
/// Each frame on the stack is one pending call of the classic recursive
/// backtracker: the cell, its shuffled directions and how many of them have
/// been tried. Directions are shuffled when a cell is entered, so the random
/// stream is consumed in the same order as the recursive version.
pub fn generate(grid: &mut Grid, start: Pos, rng: &mut impl Rng) -> Result<()> {
    if !grid.contains(start) {
        return Err(Error::StartOutOfBounds {
            row: start.row,
            col: start.col,
            rows: grid.rows,
            cols: grid.cols,
        });
    }

    let mut stack = vec![Frame::enter(grid, start, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = frame.dirs[frame.next];
        frame.next += 1;
        let pos = frame.pos;

        let Some(next) = grid.neighbor(pos, dir) else {
            continue;
        };
        if grid.cell(next).visited {
            continue;
        }
        grid.carve(pos, dir, next);
        let child = Frame::enter(grid, next, rng);
        stack.push(child);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn carved(rows: usize, cols: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(rows, cols);
        let mut rng = StdRng::seed_from_u64(seed);
        generate(&mut grid, Pos::new(0, 0), &mut rng).unwrap();
        grid
    }

    fn reachable(grid: &Grid, start: Pos) -> usize {
        let mut seen = vec![false; grid.rows() * grid.cols()];
        let mut q = VecDeque::new();
        seen[start.row * grid.cols() + start.col] = true;
        q.push_back(start);
        let mut count = 0;
        while let Some(pos) = q.pop_front() {
            count += 1;
            for dir in Dir::ALL {
                if grid.has_wall(pos, dir) {
                    continue;
                }
                let next = grid.neighbor(pos, dir).unwrap();
                let idx = next.row * grid.cols() + next.col;
                if !seen[idx] {
                    seen[idx] = true;
                    q.push_back(next);
                }
            }
        }
        count
    }

    #[test]
    fn new_grid_has_every_wall() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.cells().count(), 12);
        assert!(grid.cells().all(|c| c.walls == Walls::default() && !c.visited));
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn carve_is_a_spanning_tree() {
        for seed in 0..20 {
            let grid = carved(12, 12, seed);
            assert_eq!(grid.passage_count(), 12 * 12 - 1, "seed {seed}");
            assert_eq!(reachable(&grid, Pos::new(0, 0)), 144, "seed {seed}");
            assert!(grid.cells().all(|c| c.visited));
        }
    }

    #[test]
    fn walls_are_mirrored() {
        let grid = carved(9, 7, 42);
        for cell in grid.cells() {
            for dir in Dir::ALL {
                match grid.neighbor(cell.pos, dir) {
                    Some(next) => assert_eq!(
                        grid.has_wall(cell.pos, dir),
                        grid.has_wall(next, dir.opposite())
                    ),
                    None => assert!(grid.has_wall(cell.pos, dir), "border wall carved"),
                }
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = carved(10, 10, 7);
        let b = carved(10, 10, 7);
        let walls = |g: &Grid| g.cells().map(|c| c.walls).collect::<Vec<_>>();
        assert_eq!(walls(&a), walls(&b));
    }

    #[test]
    fn large_grid_does_not_overflow_the_stack() {
        let grid = carved(300, 300, 1);
        assert_eq!(grid.passage_count(), 300 * 300 - 1);
    }

    #[test]
    fn carve_from_interior_start() {
        let mut grid = Grid::new(6, 5);
        let mut rng = StdRng::seed_from_u64(3);
        generate(&mut grid, Pos::new(3, 2), &mut rng).unwrap();
        assert_eq!(reachable(&grid, Pos::new(3, 2)), 30);
    }

    #[test]
    fn single_cell_grid() {
        let grid = carved(1, 1, 0);
        assert_eq!(grid.passage_count(), 0);
        assert_eq!(grid.cell(Pos::new(0, 0)).walls, Walls::default());
    }

    #[test]
    fn start_outside_grid_is_rejected() {
        let mut grid = Grid::new(4, 4);
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate(&mut grid, Pos::new(4, 0), &mut rng).unwrap_err();
        assert!(matches!(err, Error::StartOutOfBounds { row: 4, col: 0, .. }));
    }
}
