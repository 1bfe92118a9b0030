use crate::maze::{Dir, Grid, Pos};

pub const DEFAULT_CELL_SIZE: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub pos: Pos,
    pub blocked: bool,
}

/// Pixel centre of a cell.
pub fn cell_center(pos: Pos, cell_size: i32) -> (i32, i32) {
    (
        pos.col as i32 * cell_size + cell_size / 2,
        pos.row as i32 * cell_size + cell_size / 2,
    )
}

/// One step from `pos`. A standing wall blocks the move and leaves the
/// position untouched; otherwise the destination is clamped to the grid.
pub fn step(grid: &Grid, pos: Pos, dir: Dir) -> MoveOutcome {
    if grid.has_wall(pos, dir) {
        return MoveOutcome { pos, blocked: true };
    }
    let (dr, dc) = dir.delta();
    let row = (pos.row as isize + dr).clamp(0, grid.rows() as isize - 1);
    let col = (pos.col as isize + dc).clamp(0, grid.cols() as isize - 1);
    MoveOutcome {
        pos: Pos::new(row as usize, col as usize),
        blocked: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub pixel: (i32, i32),
    cell_size: i32,
}

impl Player {
    pub fn new(pos: Pos, cell_size: i32) -> Self {
        Self {
            pos,
            pixel: cell_center(pos, cell_size),
            cell_size,
        }
    }

    /// Applies one step and snaps to the destination centre. Returns `false`
    /// when a wall was in the way.
    pub fn walk(&mut self, grid: &Grid, dir: Dir) -> bool {
        let outcome = step(grid, self.pos, dir);
        if outcome.blocked {
            return false;
        }
        self.pos = outcome.pos;
        self.pixel = cell_center(self.pos, self.cell_size);
        true
    }
}
