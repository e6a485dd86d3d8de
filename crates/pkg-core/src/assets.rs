//! Public asset materialization and override resolution.
//!
//! A package's `assets/` tree is mirrored into
//! `<public_dir><name>/assets-<version>/` and served from
//! `<base_url><name>/assets-<version>/`. A package that extends another
//! only ships the files it overrides; anything missing from its public
//! copy is resolved through its ancestors.

use pkg_fs::path::is_contained_relative;
use pkg_fs::{NormalizedPath, PackagePath, io};

use crate::error::{Error, Result};
use crate::package::{Package, check_cycle};

/// Per-package resolver state, created once per package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetResolver {
    does_extend: bool,
}

impl AssetResolver {
    /// Probe whether `package` extends another.
    ///
    /// An undeclared or unknown ancestor means "does not extend"; any other
    /// failure propagates.
    pub(crate) fn probe(package: &Package) -> Result<Self> {
        let does_extend = match package.extended() {
            Ok(_) => true,
            Err(Error::NoExtension { .. } | Error::ExtensionNotFound { .. }) => false,
            Err(e) => return Err(e),
        };
        tracing::debug!(slug = package.slug(), does_extend, "asset resolver created");
        Ok(Self { does_extend })
    }

    pub fn does_extend(&self) -> bool {
        self.does_extend
    }
}

/// Asset operations for one package against the loader's public area
#[derive(Debug)]
pub struct AssetManager<'a> {
    package: &'a Package,
    resolver: &'a AssetResolver,
    public_dir: NormalizedPath,
    base_url: String,
}

impl<'a> AssetManager<'a> {
    pub(crate) fn new(
        package: &'a Package,
        resolver: &'a AssetResolver,
        public_dir: NormalizedPath,
        base_url: String,
    ) -> Self {
        Self {
            package,
            resolver,
            public_dir,
            base_url,
        }
    }

    pub fn package(&self) -> &Package {
        self.package
    }

    pub fn does_extend(&self) -> bool {
        self.resolver.does_extend()
    }

    /// `name` and `version`, checked to be usable as single path segments
    fn identity(&self) -> Result<(String, String)> {
        let name = self.package.name()?;
        let version = self.package.version()?;
        for (field, value) in [("name", &name), ("version", &version)] {
            if !is_single_segment(value) {
                return Err(Error::InvalidPackageName {
                    slug: self.package.slug().to_string(),
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok((name, version))
    }

    /// `<name>/assets-<version>/`, shared by the public path and the URL
    fn versioned_segment(&self) -> Result<String> {
        let (name, version) = self.identity()?;
        Ok(format!("{name}/assets-{version}/"))
    }

    /// The directory holding every materialized version of this package
    pub fn public_root(&self) -> Result<NormalizedPath> {
        let (name, _) = self.identity()?;
        Ok(self.public_dir.join(&name).as_dir())
    }

    /// The directory the current version is materialized into
    pub fn public_path(&self) -> Result<NormalizedPath> {
        Ok(self.public_dir.join(&self.versioned_segment()?))
    }

    /// Location of `relative` inside this package's own public copy.
    pub fn asset_path(&self, relative: &str) -> Result<NormalizedPath> {
        validate(relative)?;
        Ok(self.public_path()?.join(relative))
    }

    /// URL of `relative` inside this package's own public copy.
    pub fn own_url(&self, relative: &str) -> Result<String> {
        validate(relative)?;
        Ok(format!("{}{}{}", self.base_url, self.versioned_segment()?, relative))
    }

    /// Make sure the current version's public copy exists.
    ///
    /// When it does not, every other version under the package name is
    /// removed and `assets/` is copied in. Returns whether a copy was made.
    pub fn ensure_materialized(&self) -> Result<bool> {
        let target = self.public_path()?;
        if target.is_dir() {
            return Ok(false);
        }

        let stale = self.public_root()?;
        if io::remove_dir_all(&stale.to_native())? {
            tracing::debug!(path = %stale, "removed stale public assets");
        }

        let source = self.package.dir().join(PackagePath::AssetsDir.as_str());
        let copied = if source.is_dir() {
            io::copy_dir_all(&source.to_native(), &target.to_native())?
        } else {
            std::fs::create_dir_all(target.to_native())
                .map_err(|e| pkg_fs::Error::io(target.to_native(), e))?;
            0
        };

        tracing::info!(
            slug = self.package.slug(),
            target = %target,
            files = copied,
            "materialized public assets"
        );
        Ok(true)
    }

    /// URL for `relative`, following the extension chain.
    ///
    /// The package's own copy wins when it has the file or when the package
    /// extends nothing; otherwise the ancestor resolves it.
    pub fn asset_link(&self, relative: &str) -> Result<String> {
        validate(relative)?;
        let mut visited = vec![self.package.slug().to_string()];
        self.link_inner(relative, &mut visited)
    }

    fn link_inner(&self, relative: &str, visited: &mut Vec<String>) -> Result<String> {
        self.ensure_materialized()?;

        if !self.does_extend() || self.asset_path(relative)?.is_file() {
            return self.own_url(relative);
        }

        let ancestor = self.package.extended()?;
        check_cycle(visited, ancestor.slug())?;
        let manager = ancestor.asset_manager()?;
        manager.link_inner(relative, visited)
    }

    /// Delete every materialized version of this package.
    ///
    /// Returns `false` when there was nothing to delete.
    pub fn clear_assets(&self) -> Result<bool> {
        let root = self.public_root()?;
        let removed = io::remove_dir_all(&root.to_native())?;
        if removed {
            tracing::info!(slug = self.package.slug(), path = %root, "cleared public assets");
        }
        Ok(removed)
    }
}

fn validate(relative: &str) -> Result<()> {
    if is_contained_relative(relative) {
        Ok(())
    } else {
        Err(Error::InvalidAssetPath {
            path: relative.to_string(),
        })
    }
}

/// A value that names exactly one directory below the public dir
fn is_single_segment(value: &str) -> bool {
    is_contained_relative(value)
        && value != "."
        && !value.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("logo.png")]
    #[case("css/site.css")]
    fn test_validate_accepts_contained_paths(#[case] path: &str) {
        assert!(validate(path).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("/etc/passwd")]
    #[case("../secret")]
    #[case("css/../../secret")]
    fn test_validate_rejects_escaping_paths(#[case] path: &str) {
        assert!(matches!(
            validate(path),
            Err(Error::InvalidAssetPath { .. })
        ));
    }

    #[rstest]
    #[case("fake", true)]
    #[case("1.0", true)]
    #[case("", false)]
    #[case(".", false)]
    #[case("..", false)]
    #[case("a/../..", false)]
    #[case("a\\b", false)]
    #[case("/tmp", false)]
    fn test_single_segment(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_single_segment(value), expected);
    }
}
