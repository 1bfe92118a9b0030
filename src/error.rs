use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank {}: {source}", .path.display())]
    Bank {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("question bank {} has no questions", .0.display())]
    EmptyBank(PathBuf),

    #[error("maze start ({row}, {col}) is outside a {rows}x{cols} grid")]
    StartOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("speech error: {0}")]
    Speech(String),

    #[error("no speech within {0:?}")]
    ListenTimeout(std::time::Duration),

    #[error("listening cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
