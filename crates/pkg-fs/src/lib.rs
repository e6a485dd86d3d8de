//! Filesystem primitives for the package loader
//!
//! Provides normalized path handling, atomic writes, recursive tree
//! copy/delete and a format-agnostic config store.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::PackagePath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
