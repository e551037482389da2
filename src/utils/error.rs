use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipperError {
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Not a valid ZIP archive: {} ({reason})", path.display())]
    NotAnArchive { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Another operation is already running")]
    Busy,

    #[error("Archive entry escapes the destination folder: {entry}")]
    UnsafeEntryPath { entry: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ZipperError>;
