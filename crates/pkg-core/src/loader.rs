//! Package discovery and caching
//!
//! A [`Loader`] scans root directories laid out as `<vendor>/<name>/` and
//! memoizes one [`Package`] per root identifier and slug. Adding, replacing
//! or removing a root marks the loader dirty; the next [`Loader::get_all`]
//! walks every root that has not been scanned since.
//!
//! Each root keeps its own packages. When two roots carry the same slug, the
//! merged view ([`Loader::get`], [`Loader::get_all`]) returns the one from the
//! root added first, while [`Loader::get_in`] still reaches either.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use pkg_fs::{NormalizedPath, io};
use pkg_meta::LoaderSettings;

use crate::bootstrap::{Bootstrapper, NoopBootstrapper};
use crate::error::{Error, Result};
use crate::kind::PackageKind;
use crate::package::Package;

#[derive(Debug)]
struct Root {
    name: String,
    dir: NormalizedPath,
    scanned: bool,
}

struct LoaderInner {
    kind: PackageKind,
    bootstrapper: Rc<dyn Bootstrapper>,
    roots: RefCell<Vec<Root>>,
    /// root identifier -> slug -> package
    packages: RefCell<BTreeMap<String, BTreeMap<String, Rc<Package>>>>,
    dirty: Cell<bool>,
    public_dir: RefCell<Option<NormalizedPath>>,
    base_url: RefCell<Option<String>>,
}

/// Discovers packages under a set of root directories.
///
/// Cloning a `Loader` yields another handle to the same cache.
#[derive(Clone)]
pub struct Loader {
    inner: Rc<LoaderInner>,
}

/// Non-owning handle packages keep back to their loader
#[derive(Clone)]
pub struct LoaderHandle(Weak<LoaderInner>);

impl LoaderHandle {
    /// The loader, if it is still alive
    pub fn upgrade(&self) -> Option<Loader> {
        self.0.upgrade().map(|inner| Loader { inner })
    }
}

impl fmt::Debug for LoaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoaderHandle")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}

/// Builder for a [`Loader`]
#[derive(Debug, Default)]
pub struct LoaderBuilder {
    kind: Option<PackageKind>,
    bootstrapper: Option<Rc<dyn Bootstrapper>>,
    roots: Vec<(Option<String>, PathBuf)>,
    public_dir: Option<PathBuf>,
    base_url: Option<String>,
}

impl LoaderBuilder {
    pub fn kind(mut self, kind: impl Into<PackageKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn bootstrapper(mut self, bootstrapper: Rc<dyn Bootstrapper>) -> Self {
        self.bootstrapper = Some(bootstrapper);
        self
    }

    /// Add a root identified by its own path
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push((None, path.into()));
        self
    }

    pub fn named_root(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.roots.push((Some(name.into()), path.into()));
        self
    }

    pub fn public_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(path.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the loader, validating every root.
    pub fn build(self) -> Result<Loader> {
        let loader = Loader::with_kind(
            self.kind.unwrap_or_default(),
            self.bootstrapper
                .unwrap_or_else(|| Rc::new(NoopBootstrapper)),
        );

        for (name, path) in self.roots {
            match name {
                Some(name) => loader.add_named_root(&name, &path)?,
                None => loader.add_root(&path)?,
            }
        }
        if let Some(path) = self.public_dir {
            loader.set_public_dir(&path);
        }
        if let Some(url) = self.base_url {
            loader.set_base_url(&url);
        }
        Ok(loader)
    }
}

impl Loader {
    /// An empty loader producing `package` kinds with no initialization code
    pub fn new() -> Self {
        Self::with_kind(PackageKind::default(), Rc::new(NoopBootstrapper))
    }

    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// An empty loader producing `kind` packages initialized by `bootstrapper`
    pub fn with_kind(kind: PackageKind, bootstrapper: Rc<dyn Bootstrapper>) -> Self {
        Self {
            inner: Rc::new(LoaderInner {
                kind,
                bootstrapper,
                roots: RefCell::new(Vec::new()),
                packages: RefCell::new(BTreeMap::new()),
                dirty: Cell::new(false),
                public_dir: RefCell::new(None),
                base_url: RefCell::new(None),
            }),
        }
    }

    /// Build a loader from a settings file's contents.
    pub fn from_settings(
        settings: &LoaderSettings,
        bootstrapper: Rc<dyn Bootstrapper>,
    ) -> Result<Self> {
        let mut builder = Self::builder()
            .kind(settings.kind.as_str())
            .bootstrapper(bootstrapper);

        for root in &settings.roots {
            builder = match &root.name {
                Some(name) => builder.named_root(name.clone(), root.path.clone()),
                None => builder.root(root.path.clone()),
            };
        }
        if let Some(public_dir) = &settings.public_dir {
            builder = builder.public_dir(public_dir.clone());
        }
        if let Some(base_url) = &settings.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder.build()
    }

    /// A weak handle to this loader
    pub fn handle(&self) -> LoaderHandle {
        LoaderHandle(Rc::downgrade(&self.inner))
    }

    pub fn kind(&self) -> &PackageKind {
        &self.inner.kind
    }

    /// Whether the next [`Loader::get_all`] will scan
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    // ---- roots ----

    /// Add a root identified by its normalized path.
    pub fn add_root(&self, path: impl AsRef<Path>) -> Result<()> {
        let dir = existing_dir(path.as_ref())?;
        let name = dir.as_str().to_string();
        self.insert_root(name, dir);
        Ok(())
    }

    /// Add a root under an explicit identifier.
    ///
    /// Re-adding an identifier replaces its path and evicts the packages
    /// found under the old one.
    pub fn add_named_root(&self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let dir = existing_dir(path.as_ref())?;
        self.insert_root(name.to_string(), dir);
        Ok(())
    }

    fn insert_root(&self, name: String, dir: NormalizedPath) {
        let mut roots = self.inner.roots.borrow_mut();
        match roots.iter_mut().find(|root| root.name == name) {
            Some(root) => {
                root.dir = dir;
                root.scanned = false;
                self.evict(&name);
            }
            None => {
                tracing::debug!(root = %name, dir = %dir, "root added");
                roots.push(Root {
                    name,
                    dir,
                    scanned: false,
                });
            }
        }
        self.inner.dirty.set(true);
    }

    /// Remove a root and evict every package discovered under it.
    ///
    /// Packages it was shadowing in later roots show through again.
    pub fn remove_root(&self, name: &str) -> Result<()> {
        let mut roots = self.inner.roots.borrow_mut();
        let before = roots.len();
        roots.retain(|root| root.name != name);
        if roots.len() == before {
            return Err(Error::UnknownRoot {
                name: name.to_string(),
            });
        }

        let evicted = self.evict(name);
        tracing::debug!(root = name, evicted, "root removed");
        Ok(())
    }

    fn evict(&self, name: &str) -> usize {
        self.inner
            .packages
            .borrow_mut()
            .remove(name)
            .map_or(0, |group| group.len())
    }

    /// Root identifiers and directories, in priority order
    pub fn roots(&self) -> Vec<(String, NormalizedPath)> {
        self.inner
            .roots
            .borrow()
            .iter()
            .map(|root| (root.name.clone(), root.dir.clone()))
            .collect()
    }

    // ---- discovery ----

    /// Walk every root not scanned yet. Returns how many packages were added.
    pub fn find_all(&self) -> Result<usize> {
        let mut roots = self.inner.roots.borrow_mut();
        let mut added = 0;

        for root in roots.iter_mut().filter(|root| !root.scanned) {
            added += self.scan(root)?;
            root.scanned = true;
        }
        Ok(added)
    }

    fn scan(&self, root: &Root) -> Result<usize> {
        tracing::debug!(root = %root.name, dir = %root.dir, "scanning root");
        let mut packages = self.inner.packages.borrow_mut();
        let mut group = packages.remove(&root.name).unwrap_or_default();
        let mut added = 0;

        for (vendor, vendor_dir) in io::list_dirs(&root.dir)? {
            for (name, package_dir) in io::list_dirs(&vendor_dir)? {
                let slug = format!("{vendor}/{name}");
                if group.contains_key(&slug) {
                    continue;
                }
                if let Some(other) = packages.iter().find_map(|(other, pkgs)| {
                    pkgs.contains_key(&slug).then_some(other.as_str())
                }) {
                    tracing::warn!(
                        %slug,
                        root = %root.name,
                        other,
                        "package slug found under more than one root"
                    );
                }

                let package = Package::new(
                    package_dir,
                    &root.name,
                    self.handle(),
                    self.inner.kind.clone(),
                    Rc::clone(&self.inner.bootstrapper),
                )?;
                group.insert(slug, Rc::new(package));
                added += 1;
            }
        }

        packages.insert(root.name.clone(), group);
        tracing::debug!(root = %root.name, added, "root scanned");
        Ok(added)
    }

    fn ensure_scanned(&self) -> Result<()> {
        if self.inner.dirty.get() {
            self.find_all()?;
            self.inner.dirty.set(false);
        }
        Ok(())
    }

    /// Every discovered package, sorted by slug.
    ///
    /// A slug present under several roots appears once, from the root added
    /// first.
    pub fn get_all(&self) -> Result<Vec<Rc<Package>>> {
        self.ensure_scanned()?;
        let roots = self.inner.roots.borrow();
        let packages = self.inner.packages.borrow();

        let mut merged: BTreeMap<&str, &Rc<Package>> = BTreeMap::new();
        for group in roots.iter().filter_map(|root| packages.get(&root.name)) {
            for (slug, package) in group {
                merged.entry(slug.as_str()).or_insert(package);
            }
        }
        let all: Vec<_> = merged.into_values().cloned().collect();
        Ok(all)
    }

    /// Packages discovered under one root, sorted by slug.
    pub fn get_group(&self, name: &str) -> Result<Vec<Rc<Package>>> {
        self.require_root(name)?;
        self.ensure_scanned()?;
        Ok(self
            .inner
            .packages
            .borrow()
            .get(name)
            .map(|group| group.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Look a package up by `vendor/name`, searching roots in priority order.
    pub fn get(&self, slug: &str) -> Result<Rc<Package>> {
        self.ensure_scanned()?;
        let roots = self.inner.roots.borrow();
        let packages = self.inner.packages.borrow();

        let found = roots
            .iter()
            .filter_map(|root| packages.get(&root.name))
            .find_map(|group| group.get(slug).cloned());
        found.ok_or_else(|| Error::PackageNotFound {
            slug: slug.to_string(),
        })
    }

    /// Look a package up within one root.
    pub fn get_in(&self, name: &str, slug: &str) -> Result<Rc<Package>> {
        self.require_root(name)?;
        self.ensure_scanned()?;
        self.inner
            .packages
            .borrow()
            .get(name)
            .and_then(|group| group.get(slug).cloned())
            .ok_or_else(|| Error::PackageNotFound {
                slug: slug.to_string(),
            })
    }

    fn require_root(&self, name: &str) -> Result<()> {
        if self.inner.roots.borrow().iter().any(|root| root.name == name) {
            Ok(())
        } else {
            Err(Error::UnknownRoot {
                name: name.to_string(),
            })
        }
    }

    /// Forget every package and rescan all roots on next access.
    ///
    /// Packages handed out earlier stay usable but are no longer the ones
    /// the loader returns.
    pub fn reload(&self) {
        for root in self.inner.roots.borrow_mut().iter_mut() {
            root.scanned = false;
        }
        self.inner.packages.borrow_mut().clear();
        self.inner.dirty.set(true);
        tracing::debug!("loader reloaded");
    }

    // ---- asset locations ----

    /// Set the directory assets are materialized into.
    pub fn set_public_dir(&self, path: impl AsRef<Path>) {
        *self.inner.public_dir.borrow_mut() = Some(NormalizedPath::dir(path));
    }

    /// The public directory, with a trailing separator.
    pub fn public_dir(&self) -> Result<NormalizedPath> {
        self.inner
            .public_dir
            .borrow()
            .clone()
            .ok_or(Error::PublicDirNotSet)
    }

    /// Set the URL the public directory is served under.
    pub fn set_base_url(&self, url: &str) {
        let url = format!("{}/", url.trim_end_matches('/'));
        *self.inner.base_url.borrow_mut() = Some(url);
    }

    /// The base URL, with a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        self.inner
            .base_url
            .borrow()
            .clone()
            .ok_or(Error::BaseUrlNotSet)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("kind", &self.inner.kind)
            .field("roots", &self.inner.roots.borrow())
            .field(
                "packages",
                &self.inner.packages.borrow().values().map(BTreeMap::len).sum::<usize>(),
            )
            .field("dirty", &self.inner.dirty.get())
            .finish_non_exhaustive()
    }
}

fn existing_dir(path: &Path) -> Result<NormalizedPath> {
    match NormalizedPath::existing_dir(path) {
        Ok(dir) => Ok(dir),
        Err(pkg_fs::Error::NotADirectory { .. }) => Err(Error::DirectoryNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}
