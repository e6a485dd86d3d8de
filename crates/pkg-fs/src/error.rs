//! Error types for pkg-fs

use std::path::PathBuf;

/// Result type for pkg-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by filesystem and structured-file operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An OS-level failure on `path`
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not decode as its extension claims
    #[error("{path} is not valid {format}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Cannot encode {path} as {format}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    /// No codec is registered for this extension
    #[error("Unsupported file extension '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The advisory lock on a temp file could not be taken or released
    #[error("Could not lock {path} for writing")]
    LockFailed { path: PathBuf },
}

impl Error {
    /// Wrap an OS error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
