//! `composer.json` documents for test packages.

use serde_json::{Value, json};

/// A package with just a name and a version.
pub fn basic(name: &str, version: &str) -> Value {
    json!({ "name": name, "version": version })
}

/// A package declaring that it extends `parent` (a `vendor/name` slug).
pub fn extending(name: &str, version: &str, parent: &str) -> Value {
    json!({
        "name": name,
        "version": version,
        "extra": { "extends": parent }
    })
}

/// A package carrying `extra.revision`, as read by upgrades.
pub fn with_revision(name: &str, version: &str, revision: u64) -> Value {
    json!({
        "name": name,
        "version": version,
        "extra": { "revision": revision }
    })
}
