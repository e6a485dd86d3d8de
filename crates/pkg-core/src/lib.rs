//! Core package management
//!
//! Discovery of `vendor/name` packages under root directories, extension
//! chains between packages, public asset resolution and the lifecycle
//! operations driven through named hooks.
//!
//! Everything here is single-threaded: loaders and packages share state
//! through `Rc` and interior mutability and are neither `Send` nor `Sync`.

pub mod assets;
pub mod autoload;
pub mod bootstrap;
pub mod error;
pub mod hooks;
pub mod kind;
pub mod loader;
pub mod package;
pub mod registry;

pub use assets::{AssetManager, AssetResolver};
pub use autoload::{AutoloadEntry, AutoloadMap, AutoloadStandard, Autoloader};
pub use bootstrap::{Bootstrapper, CommandHook, ManifestBootstrapper, NoopBootstrapper};
pub use error::{Error, Result};
pub use hooks::{HookCall, HookCallback, HookDispatcher, HookParams, HookRegistry, Operation};
pub use kind::PackageKind;
pub use loader::{Loader, LoaderBuilder, LoaderHandle};
pub use package::Package;
pub use registry::{DEFAULT_INSTANCE, LoaderRegistry};

pub use pkg_meta::Fallback;
