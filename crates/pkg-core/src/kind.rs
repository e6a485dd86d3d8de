//! Package kinds.
//!
//! A loader produces packages of one kind (`package`, `theme`, `plugin`,
//! ...). The kind prefixes every lifecycle hook name so that themes and
//! plugins sharing a dispatcher do not trigger each other's callbacks.

use std::fmt;

/// The kind of package a loader produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageKind(String);

impl PackageKind {
    /// The kind used when none is configured.
    pub const DEFAULT: &'static str = "package";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PackageKind {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
