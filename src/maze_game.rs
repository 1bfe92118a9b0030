use rand::Rng;
use tracing::info;

use crate::error::Result;
use crate::maze::{generate, Grid, Pos};
use crate::movement::{cell_center, Player};
use crate::speech::MazeCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeEvent {
    Moved,
    Blocked,
    Won,
    Exit,
}

impl MazeEvent {
    /// What gets narrated for the event, if anything.
    pub fn spoken(self) -> Option<&'static str> {
        match self {
            MazeEvent::Moved => None,
            MazeEvent::Blocked => Some("Wall ahead"),
            MazeEvent::Won => Some("Congratulations. Maze completed."),
            MazeEvent::Exit => Some("Exiting maze"),
        }
    }
}

/// Player walking from the top-left corner towards the bottom-right one.
#[derive(Debug, Clone)]
pub struct MazeSession {
    grid: Grid,
    player: Player,
    goal: Pos,
    goal_pixel: (i32, i32),
}

impl MazeSession {
    pub fn new(rows: usize, cols: usize, cell_size: i32, rng: &mut impl Rng) -> Result<Self> {
        let mut grid = Grid::new(rows, cols);
        let start = Pos::new(0, 0);
        generate(&mut grid, start, rng)?;
        let goal = Pos::new(rows - 1, cols - 1);
        info!(rows, cols, "maze generated");
        Ok(Self {
            grid,
            player: Player::new(start, cell_size),
            goal,
            goal_pixel: cell_center(goal, cell_size),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn goal_pixel(&self) -> (i32, i32) {
        self.goal_pixel
    }

    pub fn is_won(&self) -> bool {
        self.player.pos == self.goal
    }

    pub fn apply(&mut self, command: MazeCommand) -> MazeEvent {
        let dir = match command {
            MazeCommand::Exit => return MazeEvent::Exit,
            MazeCommand::Move(dir) => dir,
        };
        if !self.player.walk(&self.grid, dir) {
            return MazeEvent::Blocked;
        }
        if self.is_won() {
            MazeEvent::Won
        } else {
            MazeEvent::Moved
        }
    }
}
