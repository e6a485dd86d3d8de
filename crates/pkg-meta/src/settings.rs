//! Loader settings file (`packages.toml` by default).
//!
//! ```toml
//! kind = "theme"
//! public_dir = "public/packages"
//! base_url = "https://cdn.example.com/packages"
//!
//! [[roots]]
//! name = "themes"
//! path = "content/themes"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use pkg_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A root directory to scan for `vendor/name` packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSettings {
    /// Identifier used to group packages; defaults to the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Directory to scan.
    pub path: PathBuf,
}

/// Everything needed to build a loader without code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Package kind, used when naming lifecycle hooks.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Where asset trees are materialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,
    /// URL under which `public_dir` is served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Roots to scan, in priority order.
    #[serde(default)]
    pub roots: Vec<RootSettings>,
}

fn default_kind() -> String {
    "package".to_string()
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            public_dir: None,
            base_url: None,
            roots: Vec::new(),
        }
    }
}

impl LoaderSettings {
    /// Default settings file name.
    pub const DEFAULT_FILENAME: &'static str = "packages.toml";

    /// Load settings from `path`, resolving relative paths against its
    /// directory.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let mut settings: Self = ConfigStore::new().load(path).map_err(|e| match e {
            pkg_fs::Error::ConfigParse { message, .. } => Error::InvalidSettings {
                path: path.to_native(),
                message,
            },
            other => Error::Fs(other),
        })?;

        if settings.kind.trim().is_empty() {
            return Err(Error::InvalidSettings {
                path: path.to_native(),
                message: "kind must not be empty".to_string(),
            });
        }

        let base = path
            .to_native()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        settings.resolve_relative(&base);
        Ok(settings)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_relative(&mut self, base: &Path) {
        if let Some(public_dir) = self.public_dir.as_mut()
            && public_dir.is_relative()
        {
            *public_dir = base.join(&*public_dir);
        }

        for root in &mut self.roots {
            if root.path.is_relative() {
                root.path = base.join(&root.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_kind_is_package() {
        assert_eq!(LoaderSettings::default().kind, "package");
    }

    #[test]
    fn test_parse_full_settings() {
        let settings: LoaderSettings = toml::from_str(
            r#"
kind = "theme"
public_dir = "/srv/public"
base_url = "https://cdn.example.com/packages"

[[roots]]
name = "themes"
path = "/srv/themes"

[[roots]]
path = "/srv/extra"
"#,
        )
        .unwrap();

        assert_eq!(settings.kind, "theme");
        assert_eq!(settings.public_dir, Some(PathBuf::from("/srv/public")));
        assert_eq!(settings.roots.len(), 2);
        assert_eq!(settings.roots[0].name.as_deref(), Some("themes"));
        assert_eq!(settings.roots[1].name, None);
    }

    #[test]
    fn test_resolve_relative_paths() {
        let mut settings = LoaderSettings {
            public_dir: Some(PathBuf::from("public")),
            roots: vec![
                RootSettings {
                    name: None,
                    path: PathBuf::from("content/themes"),
                },
                RootSettings {
                    name: None,
                    path: PathBuf::from("/abs/plugins"),
                },
            ],
            ..LoaderSettings::default()
        };

        settings.resolve_relative(Path::new("/site"));

        assert_eq!(settings.public_dir, Some(PathBuf::from("/site/public")));
        assert_eq!(settings.roots[0].path, PathBuf::from("/site/content/themes"));
        assert_eq!(settings.roots[1].path, PathBuf::from("/abs/plugins"));
    }
}
