use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, persisting or loading an index.
#[derive(Error, Debug)]
pub enum Error {
    /// The directory holding the per-document lemma files does not exist.
    #[error("lemma directory not found: {}", .0.display())]
    LemmaDirNotFound(PathBuf),

    /// No persisted index at the given path. Callers may rebuild.
    #[error("index file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The persisted index exists but is malformed or inconsistent.
    #[error("corrupt index file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Error::Corrupt { path: path.into(), reason: reason.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
