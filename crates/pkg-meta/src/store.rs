//! Per-package metadata store.
//!
//! The store keeps two lazily loaded views of a package's `composer.json`:
//!
//! - the **JSON view**, parsed straight from the primary file, and
//! - the **config view**, read through the `composer.cache.json` artifact
//!   (see [`crate::cache`]) and rebuilt whenever the primary file changes.
//!
//! Each view is loaded at most once until it is cleared.

use std::cell::RefCell;
use std::rc::Rc;

use pkg_fs::{ConfigStore, NormalizedPath, PackagePath, io};
use serde_json::Value;

use crate::dotted::{self, Fallback};
use crate::{Error, Result, cache};

/// Lazily loaded, explicitly invalidated metadata for one package directory.
#[derive(Debug)]
pub struct MetadataStore {
    dir: NormalizedPath,
    json: RefCell<Option<Rc<Value>>>,
    config: RefCell<Option<Rc<Value>>>,
}

impl MetadataStore {
    /// Create an unloaded store for the package at `dir`.
    pub fn new(dir: NormalizedPath) -> Self {
        Self {
            dir: dir.as_dir(),
            json: RefCell::new(None),
            config: RefCell::new(None),
        }
    }

    /// The package directory, with a trailing separator.
    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// Path of the primary metadata file.
    pub fn metadata_path(&self) -> NormalizedPath {
        self.dir.join(PackagePath::MetadataFile.as_str())
    }

    /// Path of the derived fast-path artifact.
    pub fn cache_path(&self) -> NormalizedPath {
        self.dir.join(PackagePath::MetadataCache.as_str())
    }

    /// Whether the config view is currently cached in memory.
    pub fn is_loaded(&self) -> bool {
        self.config.borrow().is_some()
    }

    /// Whether the JSON view is currently cached in memory.
    pub fn is_json_loaded(&self) -> bool {
        self.json.borrow().is_some()
    }

    /// Look up `path` in the config view.
    pub fn config(&self, path: Option<&str>, fallback: Fallback) -> Result<Value> {
        let document = self.load()?;
        dotted::resolve(&document, path, fallback)
    }

    /// Look up `path` in the JSON view.
    pub fn json_config(&self, path: Option<&str>, fallback: Fallback) -> Result<Value> {
        let document = self.load_json()?;
        dotted::resolve(&document, path, fallback)
    }

    /// Look up a scalar in the config view and render it as a string.
    pub fn config_string(&self, path: &str) -> Result<String> {
        let value = self.config(Some(path), Fallback::NoFallback)?;
        dotted::scalar_to_string(path, &value)
    }

    /// Load the config view, going through the fast-path artifact.
    pub fn load(&self) -> Result<Rc<Value>> {
        if let Some(document) = self.config.borrow().as_ref() {
            return Ok(Rc::clone(document));
        }

        let metadata_path = self.metadata_path();
        let source = self.read_source(&metadata_path)?;
        let checksum = cache::source_checksum(&source);
        let cache_path = self.cache_path();

        let document = match cache::read(&cache_path, &checksum) {
            Some(document) => {
                tracing::debug!(dir = %self.dir, "metadata loaded from cache");
                document
            }
            None => {
                let document = parse_document(&metadata_path, &source)?;
                cache::write(&cache_path, &checksum, &document)?;
                document
            }
        };

        let document = Rc::new(document);
        *self.config.borrow_mut() = Some(Rc::clone(&document));
        Ok(document)
    }

    /// Load the JSON view straight from `composer.json`.
    pub fn load_json(&self) -> Result<Rc<Value>> {
        if let Some(document) = self.json.borrow().as_ref() {
            return Ok(Rc::clone(document));
        }

        let metadata_path = self.metadata_path();
        let source = self.read_source(&metadata_path)?;
        let document = Rc::new(parse_document(&metadata_path, &source)?);

        *self.json.borrow_mut() = Some(Rc::clone(&document));
        Ok(document)
    }

    /// The document last written to the artifact, even if the primary file
    /// has changed since. Normal reads never use it.
    pub fn cached_document(&self) -> Option<Value> {
        cache::read_last(&self.cache_path())
    }

    /// Render the primary file into the fast-path artifact.
    pub fn write_cache(&self) -> Result<()> {
        let metadata_path = self.metadata_path();
        let source = self.read_source(&metadata_path)?;
        let document = parse_document(&metadata_path, &source)?;
        cache::write(&self.cache_path(), &cache::source_checksum(&source), &document)
    }

    /// Drop the cached config view; the next read reloads it.
    pub fn clear(&self) {
        self.config.borrow_mut().take();
    }

    /// Drop the cached JSON view; the next read reparses `composer.json`.
    pub fn clear_json(&self) {
        self.json.borrow_mut().take();
    }

    /// Delete the fast-path artifact and drop both in-memory views.
    pub fn refresh(&self) -> Result<()> {
        if io::remove_file_if_exists(&self.cache_path())? {
            tracing::debug!(dir = %self.dir, "removed metadata cache");
        }
        self.clear_json();
        self.clear();
        Ok(())
    }

    fn read_source(&self, metadata_path: &NormalizedPath) -> Result<String> {
        // Construction guarantees the file existed; a miss here means it was
        // removed underneath us.
        if !metadata_path.is_file() {
            return Err(Error::MetadataNotFound {
                path: metadata_path.to_native(),
            });
        }
        Ok(io::read_text(metadata_path)?)
    }
}

fn parse_document(path: &NormalizedPath, source: &str) -> Result<Value> {
    let document: Value = ConfigStore::new()
        .parse(path, source)
        .map_err(|e| Error::InvalidMetadata {
            path: path.to_native(),
            message: e.to_string(),
        })?;

    if !document.is_object() {
        return Err(Error::InvalidMetadata {
            path: path.to_native(),
            message: "expected a top-level mapping".to_string(),
        });
    }

    Ok(document)
}
