//! Metadata and configuration management for the package loader.
//!
//! This crate provides the per-package [`MetadataStore`] with dotted-path
//! lookups, the derived fast-path cache artifact, and the
//! [`LoaderSettings`] file that configures roots and asset locations.

pub mod cache;
pub mod dotted;
pub mod error;
pub mod settings;
pub mod store;

pub use dotted::Fallback;
pub use error::{Error, Result};
pub use settings::{LoaderSettings, RootSettings};
pub use store::MetadataStore;
