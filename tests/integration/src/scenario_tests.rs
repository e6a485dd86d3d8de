//! Cross-crate scenarios for the package loader
//!
//! Each test builds a small site on disk and checks one observable property
//! of the loader as a host application would see it.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use pkg_core::{
    Bootstrapper, Error, Fallback, HookCall, HookDispatcher, HookRegistry, Loader, Operation,
    Package,
};
use pkg_test_utils::site::BASE_URL;
use pkg_test_utils::{TestSite, metadata};
use serde_json::{Value, json};

fn loader_for(site: &TestSite) -> Loader {
    Loader::builder()
        .root(site.packages_dir())
        .public_dir(site.public_dir())
        .base_url(BASE_URL)
        .build()
        .unwrap()
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn scenario_get_all_yields_one_package_per_slug() {
    let site = TestSite::new();
    let second = site.add_root("more");
    site.package("foolz", "fake", &metadata::basic("fake", "1.0"));
    site.package("foolz", "other", &metadata::basic("other", "1.0"));
    site.package_in(&second, "foolz", "fake", &metadata::basic("fake", "9.9"));
    site.package_in(&second, "acme", "extra", &metadata::basic("extra", "1.0"));

    let loader = loader_for(&site);
    loader.add_root(&second).unwrap();

    for _ in 0..3 {
        let packages = loader.get_all().unwrap();
        let slugs: BTreeSet<&str> = packages.iter().map(|p| p.slug()).collect();
        assert_eq!(packages.len(), 3);
        assert_eq!(slugs.len(), 3);
    }

    // The first root wins for a shadowed slug
    assert_eq!(loader.get("foolz/fake").unwrap().version().unwrap(), "1.0");

    let before = loader.get("foolz/other").unwrap();
    loader.reload();
    let after = loader.get("foolz/other").unwrap();
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(loader.get_all().unwrap().len(), 3);
}

#[test]
fn scenario_get_fails_only_for_undiscovered_slugs() {
    let site = TestSite::new();
    site.package("foolz", "fake", &metadata::basic("fake", "1.0"));
    let loader = loader_for(&site);

    assert!(loader.get("foolz/fake").is_ok());
    assert!(matches!(
        loader.get("foolz/missing"),
        Err(Error::PackageNotFound { ref slug }) if slug == "foolz/missing"
    ));
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn scenario_dotted_path_lookups() {
    let site = TestSite::new();
    site.package("foolz", "fake", &json!({"name": "fake", "a": {"b": {"c": 1}}}));
    let loader = loader_for(&site);
    let package = loader.get("foolz/fake").unwrap();

    assert_eq!(
        package.config(Some("a.b.c"), Fallback::NoFallback).unwrap(),
        json!(1)
    );
    assert_eq!(
        package.config(Some("a.b.x"), Fallback::value(5)).unwrap(),
        json!(5)
    );
    assert!(package.config(Some("a.b.x"), Fallback::NoFallback).is_err());

    package.clear_config();
    assert_eq!(
        package.config(Some("a.b.c"), Fallback::NoFallback).unwrap(),
        json!(1)
    );
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn scenario_fake_logo_is_published() {
    let site = TestSite::new();
    site.package("foolz", "fake", &metadata::basic("fake", "1.0"));
    site.asset("foolz", "fake", "logo.png", b"\x89PNG\r\n\x1a\nfake");
    let loader = loader_for(&site);

    let link = loader
        .get("foolz/fake")
        .unwrap()
        .asset_manager()
        .unwrap()
        .asset_link("logo.png")
        .unwrap();

    assert_eq!(link, format!("{BASE_URL}fake/assets-1.0/logo.png"));
    site.assert_same_bytes(
        "public/fake/assets-1.0/logo.png",
        "packages/foolz/fake/assets/logo.png",
    );
}

#[test]
fn scenario_child_falls_back_to_parent_assets() {
    let site = TestSite::new();
    site.package("vendor", "parent", &metadata::basic("parent", "1.0"));
    site.asset("vendor", "parent", "shared.css", b"parent");
    site.asset("vendor", "parent", "only-parent.js", b"parent");
    site.package("vendor", "child", &metadata::extending("child", "1.0", "vendor/parent"));
    site.asset("vendor", "child", "shared.css", b"child");
    let loader = loader_for(&site);

    let child = loader.get("vendor/child").unwrap();
    let manager = child.asset_manager().unwrap();

    assert_eq!(
        manager.asset_link("only-parent.js").unwrap(),
        format!("{BASE_URL}parent/assets-1.0/only-parent.js")
    );
    assert_eq!(
        manager.asset_link("shared.css").unwrap(),
        format!("{BASE_URL}child/assets-1.0/shared.css")
    );
}

#[test]
fn scenario_public_copy_heals_after_deletion() {
    let site = TestSite::new();
    site.package("foolz", "fake", &metadata::basic("fake", "1.0"));
    site.asset("foolz", "fake", "css/site.css", b"body {}");
    site.asset("foolz", "fake", "logo.png", b"logo");
    let loader = loader_for(&site);
    let package = loader.get("foolz/fake").unwrap();

    package.asset_manager().unwrap().asset_link("logo.png").unwrap();
    std::fs::remove_dir_all(site.public_dir().join("fake")).unwrap();

    package.asset_manager().unwrap().asset_link("logo.png").unwrap();
    site.assert_same_bytes(
        "public/fake/assets-1.0/logo.png",
        "packages/foolz/fake/assets/logo.png",
    );
    site.assert_same_bytes(
        "public/fake/assets-1.0/css/site.css",
        "packages/foolz/fake/assets/css/site.css",
    );
}

// ============================================================================
// Lifecycle
// ============================================================================

type Recorded = Rc<RefCell<Vec<(String, Value, Value)>>>;

/// Records the revisions every upgrade hook receives
#[derive(Debug, Default)]
struct UpgradeRecorder {
    seen: Recorded,
}

impl Bootstrapper for UpgradeRecorder {
    fn bootstrap(&self, package: &Package, hooks: &mut dyn HookDispatcher) -> pkg_core::Result<()> {
        let seen = Rc::clone(&self.seen);
        hooks.register(
            &package.hook_name(Operation::Upgrade)?,
            Box::new(move |call: &HookCall<'_>| {
                seen.borrow_mut().push((
                    call.name.to_string(),
                    call.param("old_revision").cloned().unwrap_or(Value::Null),
                    call.param("new_revision").cloned().unwrap_or(Value::Null),
                ));
                Ok(())
            }),
        );
        Ok(())
    }
}

#[test]
fn scenario_upgrade_reports_revision_change() {
    let site = TestSite::new();
    site.package("foolz", "fake", &metadata::with_revision("fake", "1.0", 3));
    let recorder = Rc::new(UpgradeRecorder::default());
    let loader = Loader::builder()
        .kind("theme")
        .bootstrapper(recorder.clone())
        .root(site.packages_dir())
        .build()
        .unwrap();
    let package = loader.get("foolz/fake").unwrap();

    // Cache revision 3, then ship revision 4 on disk
    assert_eq!(
        package.config(Some("extra.revision"), Fallback::NoFallback).unwrap(),
        json!(3)
    );
    site.package("foolz", "fake", &metadata::with_revision("fake", "1.0", 4));

    assert_eq!(package.upgrade(&mut HookRegistry::new()).unwrap(), 1);

    assert_eq!(
        recorder.seen.borrow().as_slice(),
        &[(
            "theme::upgrade.fake".to_string(),
            json!(3),
            json!(4)
        )]
    );
    assert_eq!(
        package.config(Some("extra.revision"), Fallback::NoFallback).unwrap(),
        json!(4)
    );
}
