//! Errors for everything outside the pure rewriters
//!
//! The rewriters themselves never fail. Reading, parsing and writing
//! notebooks, menus and source files does.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a notebook: {0}")]
    NotANotebook(String),
    #[error("cell {index} out of range (notebook has {count} cells)")]
    CellOutOfRange { index: usize, count: usize },
    #[error("cell {index} is a {kind} cell, not a code cell")]
    NotACodeCell { index: usize, kind: String },
    #[error("'{}' is larger than the maximum file size ({limit} bytes)", .path.display())]
    FileTooLarge { path: PathBuf, limit: u64 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
