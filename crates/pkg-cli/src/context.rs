//! Loader context for CLI commands
//!
//! Resolves the loader settings from `--config`, `PKG_CONFIG` or a
//! `packages.toml` in the working directory, then applies the command-line
//! overrides on top.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use pkg_core::{Loader, ManifestBootstrapper, Package};
use pkg_fs::NormalizedPath;
use pkg_meta::{LoaderSettings, RootSettings};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Loader-related options taken from the command line
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub config: Option<PathBuf>,
    pub roots: Vec<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub base_url: Option<String>,
}

impl From<&Cli> for LoaderOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            roots: cli.roots.clone(),
            public_dir: cli.public_dir.clone(),
            base_url: cli.base_url.clone(),
        }
    }
}

/// Resolve the settings for `cwd` and `options`.
pub fn resolve_settings(cwd: &Path, options: &LoaderOptions) -> Result<LoaderSettings> {
    let config_path = match &options.config {
        Some(path) => Some(cwd.join(path)),
        None => {
            let default = cwd.join(LoaderSettings::DEFAULT_FILENAME);
            default.is_file().then_some(default)
        }
    };

    let mut settings = match config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::user(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "loading loader settings");
            LoaderSettings::load(&NormalizedPath::new(&path))?
        }
        None => LoaderSettings::default(),
    };

    settings
        .roots
        .extend(options.roots.iter().map(|path| RootSettings {
            name: None,
            path: cwd.join(path),
        }));
    if let Some(public_dir) = &options.public_dir {
        settings.public_dir = Some(cwd.join(public_dir));
    }
    if let Some(base_url) = &options.base_url {
        settings.base_url = Some(base_url.clone());
    }

    if settings.roots.is_empty() {
        return Err(CliError::user(format!(
            "No package roots configured. Pass --root or create {}",
            LoaderSettings::DEFAULT_FILENAME
        )));
    }
    Ok(settings)
}

/// Build the loader commands operate on.
pub fn open_loader(cwd: &Path, options: &LoaderOptions) -> Result<Loader> {
    let settings = resolve_settings(cwd, options)?;
    Ok(Loader::from_settings(&settings, Rc::new(ManifestBootstrapper))?)
}

/// Look up `slug`, turning a miss into a user-facing error.
pub fn find_package(loader: &Loader, slug: &str) -> Result<Rc<Package>> {
    match loader.get(slug) {
        Ok(package) => Ok(package),
        Err(pkg_core::Error::PackageNotFound { .. }) => Err(CliError::user(format!(
            "Package '{}' not found. Run {} to see what is available",
            slug, "pkg list"
        ))),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_roots_is_user_error() {
        let temp = TempDir::new().unwrap();
        let err = resolve_settings(temp.path(), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn test_root_overrides_are_relative_to_cwd() {
        let temp = TempDir::new().unwrap();
        let options = LoaderOptions {
            roots: vec![PathBuf::from("packages")],
            base_url: Some("https://cdn.example.com".to_string()),
            ..LoaderOptions::default()
        };

        let settings = resolve_settings(temp.path(), &options).unwrap();
        assert_eq!(settings.roots[0].path, temp.path().join("packages"));
        assert_eq!(settings.base_url.as_deref(), Some("https://cdn.example.com"));
    }

    #[test]
    fn test_default_settings_file_is_picked_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("packages.toml"),
            "kind = \"theme\"\n\n[[roots]]\nname = \"themes\"\npath = \"themes\"\n",
        )
        .unwrap();

        let settings = resolve_settings(temp.path(), &LoaderOptions::default()).unwrap();
        assert_eq!(settings.kind, "theme");
        assert_eq!(settings.roots[0].name.as_deref(), Some("themes"));
    }

    #[test]
    fn test_missing_explicit_config_is_user_error() {
        let temp = TempDir::new().unwrap();
        let options = LoaderOptions {
            config: Some(PathBuf::from("nope.toml")),
            ..LoaderOptions::default()
        };
        assert!(matches!(
            resolve_settings(temp.path(), &options),
            Err(CliError::User { .. })
        ));
    }
}
