//! [`TestSite`] builder for package loader test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Base URL used by fixtures that need one
pub const BASE_URL: &str = "https://cdn.example.com/packages/";

/// A temporary site with a default package root and a public directory.
///
/// # Example
///
/// ```rust,no_run
/// use pkg_test_utils::{TestSite, metadata};
///
/// let site = TestSite::new();
/// site.package("foolz", "fake", &metadata::basic("fake", "1.0"));
/// site.asset("foolz", "fake", "logo.png", b"png");
/// site.assert_file_exists("packages/foolz/fake/assets/logo.png");
/// ```
pub struct TestSite {
    temp_dir: TempDir,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// Create a site with empty `packages/` and `public/` directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("packages")).unwrap();
        fs::create_dir_all(temp_dir.path().join("public")).unwrap();
        Self { temp_dir }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The default package root.
    pub fn packages_dir(&self) -> PathBuf {
        self.root().join("packages")
    }

    /// The directory assets are materialized into.
    pub fn public_dir(&self) -> PathBuf {
        self.root().join("public")
    }

    /// Create an additional, empty package root named `name`.
    pub fn add_root(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `vendor/name/composer.json` under the default root.
    pub fn package(&self, vendor: &str, name: &str, metadata: &Value) -> PathBuf {
        self.package_in(&self.packages_dir(), vendor, name, metadata)
    }

    /// Write `vendor/name/composer.json` under `root`.
    ///
    /// Overwrites existing metadata, which is how tests simulate a package
    /// being updated on disk.
    pub fn package_in(&self, root: &Path, vendor: &str, name: &str, metadata: &Value) -> PathBuf {
        let dir = root.join(vendor).join(name);
        fs::create_dir_all(&dir).unwrap();
        let content = serde_json::to_string_pretty(metadata).unwrap();
        fs::write(dir.join("composer.json"), content).unwrap();
        dir
    }

    /// Write `assets/<relative>` for a package under the default root.
    pub fn asset(&self, vendor: &str, name: &str, relative: &str, content: &[u8]) -> PathBuf {
        self.asset_in(&self.packages_dir(), vendor, name, relative, content)
    }

    /// Write `assets/<relative>` for a package under `root`.
    pub fn asset_in(
        &self,
        root: &Path,
        vendor: &str,
        name: &str,
        relative: &str,
        content: &[u8],
    ) -> PathBuf {
        let path = root.join(vendor).join(name).join("assets").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a `vendor/name` directory without any metadata.
    pub fn bare_dir(&self, vendor: &str, name: &str) -> PathBuf {
        let dir = self.packages_dir().join(vendor).join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Assert that `path` (relative to the site root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the site root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that two files relative to the site root hold the same bytes.
    ///
    /// # Panics
    /// Panics if either file cannot be read or their contents differ.
    pub fn assert_same_bytes(&self, left: &str, right: &str) {
        let read = |path: &str| {
            let full_path = self.root().join(path);
            fs::read(&full_path)
                .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
        };
        assert!(
            read(left) == read(right),
            "Files differ: {} and {}",
            left,
            right
        );
    }
}
