//! Lifecycle hooks for package operations
//!
//! Every lifecycle operation on a [`Package`] triggers a named hook,
//! `<kind>::<operation>.<package-name>`. The package's bootstrap code
//! registers callbacks under those names through a [`HookDispatcher`];
//! [`HookRegistry`] is the in-memory dispatcher shipped with this crate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::package::Package;

/// Lifecycle operations that trigger hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Run the package's regular entry point
    Execute,
    /// First-time setup
    Install,
    /// Teardown before removal
    Uninstall,
    /// Migration after the package files changed
    Upgrade,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute => write!(f, "execute"),
            Self::Install => write!(f, "install"),
            Self::Uninstall => write!(f, "uninstall"),
            Self::Upgrade => write!(f, "upgrade"),
        }
    }
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Operation; 4] = [
        Self::Execute,
        Self::Install,
        Self::Uninstall,
        Self::Upgrade,
    ];

    /// Parse an operation from its hook-name form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "execute" => Some(Self::Execute),
            "install" => Some(Self::Install),
            "uninstall" => Some(Self::Uninstall),
            "upgrade" => Some(Self::Upgrade),
            _ => None,
        }
    }

    /// List all valid operation names
    pub fn all_names() -> &'static [&'static str] {
        &["execute", "install", "uninstall", "upgrade"]
    }
}

/// Named parameters passed along with a hook
pub type HookParams = BTreeMap<String, Value>;

/// A single hook invocation, as seen by callbacks
#[derive(Debug)]
pub struct HookCall<'a> {
    /// Full hook name
    pub name: &'a str,
    /// The package the operation runs on
    pub package: &'a Package,
    /// Named parameters, e.g. `old_revision` and `new_revision` on upgrade
    pub params: &'a HookParams,
}

impl HookCall<'_> {
    /// Look up a named parameter
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

/// A callback registered under a hook name
pub type HookCallback = Box<dyn FnMut(&HookCall<'_>) -> Result<()>>;

/// The dispatcher packages register and trigger their hooks through
pub trait HookDispatcher {
    /// Add a callback under `name`
    fn register(&mut self, name: &str, callback: HookCallback);

    /// Remove every callback under `name`, returning how many were removed
    fn clear(&mut self, name: &str) -> usize;

    /// Run every callback under `call.name` in registration order.
    ///
    /// Stops at the first failing callback. Returns the number of callbacks
    /// that ran.
    fn trigger(&mut self, call: &HookCall<'_>) -> Result<usize>;
}

/// In-memory [`HookDispatcher`]
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Vec<HookCallback>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks registered under `name`
    pub fn count(&self, name: &str) -> usize {
        self.hooks.get(name).map_or(0, Vec::len)
    }

    /// Registered hook names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .hooks
            .iter()
            .filter(|(_, callbacks)| !callbacks.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .hooks
            .iter()
            .map(|(name, callbacks)| (name.as_str(), callbacks.len()))
            .collect();
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}

impl HookDispatcher for HookRegistry {
    fn register(&mut self, name: &str, callback: HookCallback) {
        tracing::debug!(hook = name, "registering hook callback");
        self.hooks.entry(name.to_string()).or_default().push(callback);
    }

    fn clear(&mut self, name: &str) -> usize {
        self.hooks.remove(name).map_or(0, |callbacks| callbacks.len())
    }

    fn trigger(&mut self, call: &HookCall<'_>) -> Result<usize> {
        let Some(callbacks) = self.hooks.get_mut(call.name) else {
            tracing::debug!(hook = call.name, "no callbacks registered");
            return Ok(0);
        };

        tracing::debug!(hook = call.name, callbacks = callbacks.len(), "triggering hook");
        for callback in callbacks.iter_mut() {
            callback(call)?;
        }
        Ok(callbacks.len())
    }
}
