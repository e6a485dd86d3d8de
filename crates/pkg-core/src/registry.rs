//! Named loader instances
//!
//! Hosts that need several independent loaders (one for themes, one for
//! plugins, ...) keep them in a [`LoaderRegistry`] and pass the registry
//! around explicitly.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::bootstrap::{Bootstrapper, NoopBootstrapper};
use crate::kind::PackageKind;
use crate::loader::Loader;

/// Name of the instance used when the host does not pick one
pub const DEFAULT_INSTANCE: &str = "default";

/// A table of independently configured loaders keyed by name
#[derive(Debug)]
pub struct LoaderRegistry {
    kind: PackageKind,
    bootstrapper: Rc<dyn Bootstrapper>,
    instances: BTreeMap<String, Loader>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new(PackageKind::default(), Rc::new(NoopBootstrapper))
    }
}

impl LoaderRegistry {
    /// A registry whose forged loaders use `kind` and `bootstrapper`
    pub fn new(kind: PackageKind, bootstrapper: Rc<dyn Bootstrapper>) -> Self {
        Self {
            kind,
            bootstrapper,
            instances: BTreeMap::new(),
        }
    }

    /// The loader named `name`, created empty on first access.
    pub fn forge(&mut self, name: &str) -> Loader {
        let kind = self.kind.clone();
        let bootstrapper = Rc::clone(&self.bootstrapper);
        self.forge_with(name, || Loader::with_kind(kind, bootstrapper))
    }

    /// The loader named `name`, created by `create` on first access.
    pub fn forge_with(&mut self, name: &str, create: impl FnOnce() -> Loader) -> Loader {
        self.instances
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(instance = name, "loader instance created");
                create()
            })
            .clone()
    }

    /// The loader named `name`, if it exists
    pub fn get(&self, name: &str) -> Option<Loader> {
        self.instances.get(name).cloned()
    }

    /// Drop the loader named `name`. Returns whether it existed.
    ///
    /// Handles already given out keep working; the next
    /// [`LoaderRegistry::forge`] creates a fresh instance.
    pub fn destroy(&mut self, name: &str) -> bool {
        self.instances.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Instance names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.instances.keys().map(String::as_str).collect()
    }
}
