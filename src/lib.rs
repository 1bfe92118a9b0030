//! Voice-driven terminal quiz and maze games.
//!
//! The game logic (maze carving, movement, answer matching, the command
//! mailbox) is free of I/O; speech, terminal and question banks sit behind
//! small adapters so sessions can be driven from tests.

pub mod config;
pub mod error;
pub mod keyboard;
pub mod learning;
pub mod mailbox;
pub mod matcher;
pub mod maze;
pub mod maze_game;
pub mod menu;
pub mod movement;
pub mod play;
pub mod quiz;
pub mod render;
pub mod speech;

pub use config::Settings;
pub use error::{Error, Result};
pub use mailbox::{Mailbox, Poster};
pub use matcher::{is_correct, normalize};
pub use maze::{generate, Dir, Grid, Pos};
pub use maze_game::{MazeEvent, MazeSession};
pub use movement::{step, MoveOutcome, Player};
pub use play::Outcome;
pub use quiz::{load_bank, Question, QuizSession};
pub use speech::Services;
