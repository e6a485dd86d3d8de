//! End-to-end integration test for the vertical slice
//!
//! This test exercises the complete flow: settings file -> loader ->
//! discovery -> metadata -> assets -> lifecycle hooks.

use std::fs;
use std::rc::Rc;

use pkg_core::{Fallback, HookRegistry, Loader, ManifestBootstrapper, NoopBootstrapper};
use pkg_fs::NormalizedPath;
use pkg_meta::LoaderSettings;
use pkg_test_utils::{TestSite, metadata};
use serde_json::json;

/// Set up a site with a settings file, two roots and a small theme family
fn setup_site() -> TestSite {
    let site = TestSite::new();
    let themes = site.add_root("themes");
    let plugins = site.add_root("plugins");

    site.package_in(&themes, "foolz", "base", &metadata::basic("base", "1.0"));
    site.asset_in(&themes, "foolz", "base", "css/site.css", b"body { color: blue }");
    site.package_in(
        &themes,
        "foolz",
        "dark",
        &metadata::extending("dark", "2.1", "foolz/base"),
    );
    site.asset_in(&themes, "foolz", "dark", "logo.png", b"dark logo");
    site.package_in(&plugins, "acme", "gallery", &metadata::basic("gallery", "0.3"));

    fs::write(
        site.root().join("packages.toml"),
        r#"
kind = "theme"
public_dir = "public"
base_url = "https://cdn.example.com/packages"

[[roots]]
name = "themes"
path = "themes"

[[roots]]
name = "plugins"
path = "plugins"
"#,
    )
    .unwrap();

    site
}

fn load_loader(site: &TestSite) -> Loader {
    let settings =
        LoaderSettings::load(&NormalizedPath::new(site.root().join("packages.toml"))).unwrap();
    Loader::from_settings(&settings, Rc::new(ManifestBootstrapper)).unwrap()
}

#[test]
fn test_settings_drive_discovery() {
    let site = setup_site();
    let loader = load_loader(&site);

    assert_eq!(loader.kind().as_str(), "theme");

    let slugs: Vec<String> = loader
        .get_all()
        .unwrap()
        .iter()
        .map(|p| p.slug().to_string())
        .collect();
    assert_eq!(slugs, vec!["acme/gallery", "foolz/base", "foolz/dark"]);

    let themes = loader.get_group("themes").unwrap();
    assert_eq!(themes.len(), 2);
    assert!(themes.iter().all(|p| p.root_name() == "themes"));

    let gallery = loader.get_in("plugins", "acme/gallery").unwrap();
    assert_eq!(gallery.version().unwrap(), "0.3");
}

#[test]
fn test_full_flow_assets_and_config() {
    let site = setup_site();
    let loader = load_loader(&site);
    let dark = loader.get("foolz/dark").unwrap();

    assert_eq!(
        dark.inherited_config("version", Fallback::NoFallback).unwrap(),
        json!("2.1")
    );

    let manager = dark.asset_manager().unwrap();
    assert_eq!(
        manager.asset_link("logo.png").unwrap(),
        "https://cdn.example.com/packages/dark/assets-2.1/logo.png"
    );
    assert_eq!(
        manager.asset_link("css/site.css").unwrap(),
        "https://cdn.example.com/packages/base/assets-1.0/css/site.css"
    );

    site.assert_same_bytes(
        "public/dark/assets-2.1/logo.png",
        "themes/foolz/dark/assets/logo.png",
    );
    site.assert_same_bytes(
        "public/base/assets-1.0/css/site.css",
        "themes/foolz/base/assets/css/site.css",
    );
}

#[cfg(unix)]
#[test]
fn test_full_flow_lifecycle_hooks() {
    let site = setup_site();
    let themes = site.root().join("themes");
    site.package_in(
        &themes,
        "foolz",
        "hooked",
        &json!({
            "name": "hooked",
            "version": "1.0",
            "extra": {
                "hooks": {
                    "install": {"command": "sh", "args": ["-c", "echo $HOOK_NAME > hook.txt"]}
                }
            }
        }),
    );
    let loader = load_loader(&site);
    let package = loader.get("foolz/hooked").unwrap();

    let mut hooks = HookRegistry::new();
    assert_eq!(package.install(&mut hooks).unwrap(), 1);

    let written = fs::read_to_string(themes.join("foolz/hooked/hook.txt")).unwrap();
    assert_eq!(written.trim(), "theme::install.hooked");

    // Operations without a declared hook run nothing
    assert_eq!(package.uninstall(&mut hooks).unwrap(), 0);
}

#[test]
fn test_loader_without_settings_file() {
    let site = TestSite::new();
    site.package("foolz", "fake", &metadata::basic("fake", "1.0"));

    let loader = Loader::builder()
        .bootstrapper(Rc::new(NoopBootstrapper))
        .root(site.packages_dir())
        .build()
        .unwrap();

    assert_eq!(loader.get_all().unwrap().len(), 1);
    assert_eq!(loader.get("foolz/fake").unwrap().name().unwrap(), "fake");
}
