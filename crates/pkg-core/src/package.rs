//! A discovered package
//!
//! A [`Package`] bundles a `vendor/name` directory, its metadata store,
//! its asset resolver and its lifecycle operations. Packages are created by
//! a [`Loader`] and keep a weak handle back to it for resolving the
//! package they extend.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

use pkg_fs::{NormalizedPath, PackagePath};
use pkg_meta::dotted::{self, scalar_to_string};
use pkg_meta::{Fallback, MetadataStore};
use serde_json::Value;

use crate::assets::{AssetManager, AssetResolver};
use crate::autoload::{self, AutoloadStandard, Autoloader};
use crate::bootstrap::Bootstrapper;
use crate::error::{Error, Result};
use crate::hooks::{HookCall, HookDispatcher, HookParams, Operation};
use crate::kind::PackageKind;
use crate::loader::{Loader, LoaderHandle};

/// Metadata key naming the package this one extends
pub const EXTENDS_KEY: &str = "extra.extends";

/// Metadata key holding the revision passed to upgrade hooks
pub const REVISION_KEY: &str = "extra.revision";

/// One discoverable unit of extension code and assets
pub struct Package {
    dir: NormalizedPath,
    slug: String,
    root: String,
    store: MetadataStore,
    loader: LoaderHandle,
    kind: PackageKind,
    bootstrapper: Rc<dyn Bootstrapper>,
    bootstrapped: Cell<bool>,
    assets: OnceCell<AssetResolver>,
}

impl Package {
    /// Bind a package to `dir`.
    ///
    /// Fails when the directory is missing or carries no metadata file. The
    /// metadata content is not read until first access.
    pub(crate) fn new(
        dir: NormalizedPath,
        root: &str,
        loader: LoaderHandle,
        kind: PackageKind,
        bootstrapper: Rc<dyn Bootstrapper>,
    ) -> Result<Self> {
        let dir = dir.as_dir();
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound {
                path: dir.to_native(),
            });
        }
        if !dir.join(PackagePath::MetadataFile.as_str()).is_file() {
            return Err(Error::MetadataNotFound {
                dir: dir.to_native(),
            });
        }

        let slug = dir.tail(2).ok_or_else(|| Error::DirectoryNotFound {
            path: dir.to_native(),
        })?;

        Ok(Self {
            store: MetadataStore::new(dir.clone()),
            dir,
            slug,
            root: root.to_string(),
            loader,
            kind,
            bootstrapper,
            bootstrapped: Cell::new(false),
            assets: OnceCell::new(),
        })
    }

    /// The package directory, with a trailing separator
    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// The `vendor/name` key
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Identifier of the root the package was discovered under
    pub fn root_name(&self) -> &str {
        &self.root
    }

    pub fn kind(&self) -> &PackageKind {
        &self.kind
    }

    /// The metadata store backing the config lookups
    pub fn metadata(&self) -> &MetadataStore {
        &self.store
    }

    /// The loader that produced this package.
    pub fn loader(&self) -> Result<Loader> {
        self.loader.upgrade().ok_or_else(|| Error::LoaderDropped {
            slug: self.slug.clone(),
        })
    }

    // ---- metadata ----

    /// Dotted-path lookup in the config view.
    ///
    /// `None` returns the whole document. A miss returns the fallback, or
    /// fails when the fallback is [`Fallback::NoFallback`].
    pub fn config(&self, path: Option<&str>, fallback: Fallback) -> Result<Value> {
        Ok(self.store.config(path, fallback)?)
    }

    /// Dotted-path lookup straight from `composer.json`.
    pub fn json_config(&self, path: Option<&str>, fallback: Fallback) -> Result<Value> {
        Ok(self.store.json_config(path, fallback)?)
    }

    /// The `name` field
    pub fn name(&self) -> Result<String> {
        Ok(self.store.config_string("name")?)
    }

    /// The `version` field
    pub fn version(&self) -> Result<String> {
        Ok(self.store.config_string("version")?)
    }

    pub fn clear_config(&self) {
        self.store.clear();
    }

    pub fn clear_json_config(&self) {
        self.store.clear_json();
    }

    /// Delete the fast-path artifact and drop both cached views.
    pub fn refresh_config(&self) -> Result<()> {
        Ok(self.store.refresh()?)
    }

    /// Render `composer.json` into the fast-path artifact.
    pub fn write_config_cache(&self) -> Result<()> {
        Ok(self.store.write_cache()?)
    }

    // ---- extension chain ----

    /// The slug this package declares it extends, if any
    pub fn extends(&self) -> Result<Option<String>> {
        match self.store.config(Some(EXTENDS_KEY), Fallback::NoFallback) {
            Ok(value) => Ok(Some(scalar_to_string(EXTENDS_KEY, &value)?)),
            Err(pkg_meta::Error::MissingKey { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the package this one extends through the loader.
    ///
    /// Fails with [`Error::NoExtension`] when nothing is declared and with
    /// [`Error::ExtensionNotFound`] when the declared package is unknown.
    pub fn extended(&self) -> Result<Rc<Package>> {
        let Some(extends) = self.extends()? else {
            return Err(Error::NoExtension {
                slug: self.slug.clone(),
            });
        };

        match self.loader()?.get(&extends) {
            Ok(package) => Ok(package),
            Err(Error::PackageNotFound { .. }) => Err(Error::ExtensionNotFound {
                slug: self.slug.clone(),
                extends,
            }),
            Err(e) => Err(e),
        }
    }

    /// Look `path` up here, then along the extension chain.
    ///
    /// When no package in the chain has the key, `fallback` applies.
    pub fn inherited_config(&self, path: &str, fallback: Fallback) -> Result<Value> {
        let document = self.store.load()?;
        if let Some(value) = dotted::find(&document, path) {
            return Ok(value.clone());
        }

        let mut visited = vec![self.slug.clone()];
        let mut current = self.extended();
        loop {
            let package = match current {
                Ok(package) => package,
                Err(e) if e.is_chain_end() => break,
                Err(e) => return Err(e),
            };
            check_cycle(&mut visited, package.slug())?;

            let document = package.store.load()?;
            if let Some(value) = dotted::find(&document, path) {
                return Ok(value.clone());
            }
            current = package.extended();
        }

        match fallback {
            Fallback::Value(value) => Ok(value),
            Fallback::NoFallback => Err(pkg_meta::Error::MissingKey {
                key: path.to_string(),
            }
            .into()),
        }
    }

    // ---- assets ----

    /// The package's asset manager.
    ///
    /// The first call probes whether the package extends another; a missing
    /// or undeclared ancestor counts as "does not extend".
    pub fn asset_manager(&self) -> Result<AssetManager<'_>> {
        let resolver = match self.assets.get() {
            Some(resolver) => resolver,
            None => {
                let resolver = AssetResolver::probe(self)?;
                self.assets.get_or_init(|| resolver)
            }
        };
        let loader = self.loader()?;
        Ok(AssetManager::new(
            self,
            resolver,
            loader.public_dir()?,
            loader.base_url()?,
        ))
    }

    // ---- lifecycle ----

    /// Forward `autoload.psr-0` and `autoload.psr-4` mappings.
    ///
    /// Returns the number of mappings forwarded.
    pub fn enable_autoloader(&self, autoloader: &mut dyn Autoloader) -> Result<usize> {
        let mut forwarded = 0;
        for standard in AutoloadStandard::ALL {
            let key = format!("autoload.{}", standard.key());
            let section = self.config(Some(&key), Fallback::Value(Value::Null))?;
            if section.is_null() {
                continue;
            }
            for (namespace, path) in autoload::collect_section(standard, &section, &self.dir)? {
                autoloader.register(standard, &namespace, &path);
                forwarded += 1;
            }
        }
        tracing::debug!(slug = %self.slug, forwarded, "autoload mappings forwarded");
        Ok(forwarded)
    }

    /// Run the package's initialization code.
    pub fn bootstrap(&self, hooks: &mut dyn HookDispatcher) -> Result<()> {
        self.bootstrapper.bootstrap(self, hooks)?;
        self.bootstrapped.set(true);
        Ok(())
    }

    /// Whether [`Package::bootstrap`] has completed at least once
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.get()
    }

    /// Hook name for `operation`: `<kind>::<operation>.<package-name>`.
    pub fn hook_name(&self, operation: Operation) -> Result<String> {
        Ok(format!("{}::{}.{}", self.kind, operation, self.name()?))
    }

    /// Run the package's execute hook. Returns the number of callbacks run.
    pub fn execute(&self, hooks: &mut dyn HookDispatcher) -> Result<usize> {
        self.run_operation(Operation::Execute, hooks, &HookParams::new())
    }

    pub fn install(&self, hooks: &mut dyn HookDispatcher) -> Result<usize> {
        self.run_operation(Operation::Install, hooks, &HookParams::new())
    }

    pub fn uninstall(&self, hooks: &mut dyn HookDispatcher) -> Result<usize> {
        self.run_operation(Operation::Uninstall, hooks, &HookParams::new())
    }

    /// Run the upgrade hook with `old_revision` and `new_revision`.
    ///
    /// The old revision comes from the config held in memory or, in a
    /// process that has not read it yet, from the artifact left by the last
    /// one. The new one comes from a fresh read. Afterwards the config is
    /// refreshed and the artifact rewritten, so the next upgrade compares
    /// against this revision.
    pub fn upgrade(&self, hooks: &mut dyn HookDispatcher) -> Result<usize> {
        let previous = if self.store.is_loaded() {
            None
        } else {
            self.store.cached_document()
        };
        let old_revision = match previous {
            Some(document) => dotted::resolve(&document, Some(REVISION_KEY), Fallback::value(0))?,
            None => self.config(Some(REVISION_KEY), Fallback::value(0))?,
        };
        self.clear_config();
        let new_revision = self.config(Some(REVISION_KEY), Fallback::value(0))?;

        let mut params = HookParams::new();
        params.insert("old_revision".to_string(), old_revision);
        params.insert("new_revision".to_string(), new_revision);

        let ran = self.run_operation(Operation::Upgrade, hooks, &params)?;
        self.refresh_config()?;
        self.write_config_cache()?;
        Ok(ran)
    }

    fn run_operation(
        &self,
        operation: Operation,
        hooks: &mut dyn HookDispatcher,
        params: &HookParams,
    ) -> Result<usize> {
        let name = self.hook_name(operation)?;
        hooks.clear(&name);
        self.bootstrap(hooks)?;

        tracing::info!(slug = %self.slug, %operation, "running package operation");
        hooks.trigger(&HookCall {
            name: &name,
            package: self,
            params,
        })
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("slug", &self.slug)
            .field("dir", &self.dir)
            .field("root", &self.root)
            .field("kind", &self.kind)
            .field("bootstrapped", &self.bootstrapped.get())
            .finish_non_exhaustive()
    }
}

/// Record `slug` as visited, failing if the chain already passed through it.
pub(crate) fn check_cycle(visited: &mut Vec<String>, slug: &str) -> Result<()> {
    if visited.iter().any(|seen| seen == slug) {
        let mut chain = visited.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(slug);
        return Err(Error::ExtensionCycle { chain });
    }
    visited.push(slug.to_string());
    Ok(())
}
