//! Names with a fixed meaning inside a package directory.

use std::fmt;

/// Well-known entries of a `vendor/name/` directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagePath {
    /// The metadata document every package carries
    MetadataFile,
    /// Rendered copy of the metadata document, keyed by its fingerprint
    MetadataCache,
    /// Static files mirrored into the public directory
    AssetsDir,
}

impl PackagePath {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetadataFile => "composer.json",
            Self::MetadataCache => "composer.cache.json",
            Self::AssetsDir => "assets",
        }
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_sits_next_to_metadata() {
        assert_eq!(PackagePath::MetadataFile.to_string(), "composer.json");
        assert!(
            PackagePath::MetadataCache
                .as_str()
                .starts_with("composer.")
        );
    }
}
