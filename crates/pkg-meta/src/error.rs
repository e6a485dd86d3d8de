//! Error types for pkg-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] pkg_fs::Error),

    #[error("Package metadata not found at {path}")]
    MetadataNotFound { path: PathBuf },

    #[error("Invalid package metadata at {path}: {message}")]
    InvalidMetadata { path: PathBuf, message: String },

    #[error("Config key '{key}' not found")]
    MissingKey { key: String },

    #[error("Config key '{key}' is not a {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error("Invalid loader settings at {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },
}
