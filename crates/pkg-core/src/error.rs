//! Error types for pkg-core

use std::path::PathBuf;

/// Result type for pkg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pkg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured root or package directory does not exist
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The directory exists but carries no metadata file
    #[error("No package metadata in {dir}")]
    MetadataNotFound { dir: PathBuf },

    /// Slug lookup failed
    #[error("There is no such package: {slug}")]
    PackageNotFound { slug: String },

    /// Group lookup for a root identifier that was never added
    #[error("There is no such root directory: {name}")]
    UnknownRoot { name: String },

    /// The package does not declare `extra.extends`
    #[error("Package {slug} does not extend another package")]
    NoExtension { slug: String },

    /// The package declares an ancestor the loader does not know
    #[error("Package {slug} extends {extends}, which is not available")]
    ExtensionNotFound { slug: String, extends: String },

    /// Following `extra.extends` came back to a package already visited
    #[error("Extension cycle detected: {chain}")]
    ExtensionCycle { chain: String },

    /// The loader that produced the package no longer exists
    #[error("The loader that produced {slug} has been dropped")]
    LoaderDropped { slug: String },

    /// Asset operations need a public directory
    #[error("The public dir was not set")]
    PublicDirNotSet,

    /// Asset links need a base URL
    #[error("The base url was not set")]
    BaseUrlNotSet,

    /// Asset paths must stay inside the package's public copy
    #[error("Invalid asset path: {path}")]
    InvalidAssetPath { path: String },

    /// `name` or `version` cannot name a directory in the public area
    #[error("Package {slug} has an invalid {field} for asset paths: '{value}'")]
    InvalidPackageName {
        slug: String,
        field: &'static str,
        value: String,
    },

    /// A hook declaration in the package metadata could not be understood
    #[error("Invalid hook {hook}: {message}")]
    InvalidHook { hook: String, message: String },

    /// A hook callback failed
    #[error("Hook {hook} failed ({command}): {message}")]
    HookFailed {
        hook: String,
        command: String,
        message: String,
    },

    // Transparent wrappers for underlying crate errors
    /// Metadata error from pkg-meta
    #[error(transparent)]
    Config(#[from] pkg_meta::Error),

    /// Filesystem error from pkg-fs
    #[error(transparent)]
    Fs(#[from] pkg_fs::Error),
}

impl Error {
    /// Whether this error means "the extension chain ends here".
    ///
    /// Only an absent `extra.extends` ends a chain; a declared but missing
    /// ancestor is a configuration error the host must see.
    pub fn is_chain_end(&self) -> bool {
        matches!(self, Self::NoExtension { .. })
    }

    /// Whether this error came from reading package metadata.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
