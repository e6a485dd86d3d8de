//! Integration tests for loading loader settings

use std::fs;
use std::path::PathBuf;

use pkg_fs::NormalizedPath;
use pkg_meta::{Error, LoaderSettings};
use tempfile::TempDir;

fn setup_settings_file(temp: &TempDir, file: &str, content: &str) -> NormalizedPath {
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();
    NormalizedPath::new(path)
}

#[test]
fn test_load_resolves_relative_paths() {
    let temp = TempDir::new().unwrap();
    let path = setup_settings_file(
        &temp,
        "packages.toml",
        r#"
public_dir = "public"
base_url = "http://localhost/packages"

[[roots]]
name = "themes"
path = "content/themes"
"#,
    );

    let settings = LoaderSettings::load(&path).unwrap();

    assert_eq!(settings.kind, "package");
    assert_eq!(settings.public_dir, Some(temp.path().join("public")));
    assert_eq!(settings.roots[0].path, temp.path().join("content/themes"));
    assert_eq!(settings.base_url.as_deref(), Some("http://localhost/packages"));
}

#[test]
fn test_load_json_settings() {
    let temp = TempDir::new().unwrap();
    let path = setup_settings_file(
        &temp,
        "packages.json",
        r#"{"kind": "plugin", "roots": [{"path": "/srv/plugins"}]}"#,
    );

    let settings = LoaderSettings::load(&path).unwrap();

    assert_eq!(settings.kind, "plugin");
    assert_eq!(settings.roots[0].path, PathBuf::from("/srv/plugins"));
}

#[test]
fn test_invalid_settings_reported() {
    let temp = TempDir::new().unwrap();
    let path = setup_settings_file(&temp, "packages.toml", "roots = 5");

    let result = LoaderSettings::load(&path);
    assert!(matches!(result, Err(Error::InvalidSettings { .. })));
}

#[test]
fn test_empty_kind_rejected() {
    let temp = TempDir::new().unwrap();
    let path = setup_settings_file(&temp, "packages.toml", "kind = \"\"");

    let result = LoaderSettings::load(&path);
    assert!(matches!(result, Err(Error::InvalidSettings { .. })));
}

#[test]
fn test_missing_settings_file_is_fs_error() {
    let result = LoaderSettings::load(&NormalizedPath::new("/nonexistent/packages.toml"));
    assert!(matches!(result, Err(Error::Fs(_))));
}
