//! Package initialization.
//!
//! A [`Bootstrapper`] is the unit of code a package runs before any of its
//! lifecycle hooks fire. It is injected into the [`Loader`](crate::Loader)
//! and shared by every package the loader produces.
//!
//! [`ManifestBootstrapper`] registers subprocess hooks declared in the
//! package metadata:
//!
//! ```json
//! {
//!   "extra": {
//!     "hooks": {
//!       "install": { "command": "sh", "args": ["-c", "echo ${PACKAGE_NAME}"] },
//!       "upgrade": [
//!         { "command": "./migrate", "args": ["${OLD_REVISION}", "${NEW_REVISION}"] }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::process::Command;

use pkg_fs::path::is_contained_relative;
use pkg_meta::Fallback;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::hooks::{HookCall, HookDispatcher, Operation};
use crate::package::Package;

/// Runs a package's initialization code
pub trait Bootstrapper: fmt::Debug {
    /// Initialize `package`, registering its hook callbacks on `hooks`.
    fn bootstrap(&self, package: &Package, hooks: &mut dyn HookDispatcher) -> Result<()>;
}

/// A bootstrapper that registers nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBootstrapper;

impl Bootstrapper for NoopBootstrapper {
    fn bootstrap(&self, _package: &Package, _hooks: &mut dyn HookDispatcher) -> Result<()> {
        Ok(())
    }
}

/// A subprocess declared under `extra.hooks.<operation>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHook {
    /// The command to execute
    pub command: String,
    /// Arguments, with `${VAR}` substitution
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory relative to the package directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HookDeclaration {
    One(CommandHook),
    Many(Vec<CommandHook>),
}

impl HookDeclaration {
    fn into_vec(self) -> Vec<CommandHook> {
        match self {
            Self::One(hook) => vec![hook],
            Self::Many(hooks) => hooks,
        }
    }
}

/// Registers the command hooks a package declares in its metadata
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestBootstrapper;

impl ManifestBootstrapper {
    /// Read the declared hooks, keyed by operation.
    pub fn declared_hooks(package: &Package) -> Result<Vec<(Operation, Vec<CommandHook>)>> {
        let section = package.config(Some("extra.hooks"), Fallback::Value(Value::Null))?;
        let Value::Object(section) = section else {
            return Ok(Vec::new());
        };

        let mut declared = Vec::new();
        for (name, declaration) in section {
            let operation = Operation::parse(&name).ok_or_else(|| Error::InvalidHook {
                hook: name.clone(),
                message: format!(
                    "unknown operation, expected one of: {}",
                    Operation::all_names().join(", ")
                ),
            })?;

            let hooks = serde_json::from_value::<HookDeclaration>(declaration)
                .map_err(|e| Error::InvalidHook {
                    hook: name.clone(),
                    message: e.to_string(),
                })?
                .into_vec();

            for hook in &hooks {
                if let Some(dir) = &hook.working_dir
                    && !is_contained_relative(dir)
                {
                    return Err(Error::InvalidHook {
                        hook: name.clone(),
                        message: format!(
                            "working_dir {dir:?} must be a relative path inside the package"
                        ),
                    });
                }
            }

            declared.push((operation, hooks));
        }
        Ok(declared)
    }
}

impl Bootstrapper for ManifestBootstrapper {
    fn bootstrap(&self, package: &Package, hooks: &mut dyn HookDispatcher) -> Result<()> {
        for (operation, commands) in Self::declared_hooks(package)? {
            let hook_name = package.hook_name(operation)?;
            for command in commands {
                hooks.register(&hook_name, Box::new(move |call: &HookCall<'_>| {
                    run_command(&command, call)
                }));
            }
        }
        Ok(())
    }
}

/// Execute a single command hook as a subprocess
fn run_command(hook: &CommandHook, call: &HookCall<'_>) -> Result<()> {
    let package = call.package;
    let vars = hook_vars(call)?;

    let work_dir = match &hook.working_dir {
        Some(dir) => package.dir().join(dir),
        None => package.dir().clone(),
    };

    let args: Vec<String> = hook
        .args
        .iter()
        .map(|arg| substitute_vars(arg, &vars))
        .collect();

    tracing::debug!(hook = call.name, command = %hook.command, "running hook command");

    let output = Command::new(&hook.command)
        .args(&args)
        .current_dir(work_dir.to_native())
        .envs(&vars)
        .output()
        .map_err(|e| Error::HookFailed {
            hook: call.name.to_string(),
            command: hook.command.clone(),
            message: e.to_string(),
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        format!(
            "exited with non-zero status (exit code: {:?})",
            output.status.code()
        )
    } else {
        format!(
            "exited with non-zero status (exit code: {:?}): {}",
            output.status.code(),
            stderr
        )
    };

    Err(Error::HookFailed {
        hook: call.name.to_string(),
        command: hook.command.clone(),
        message,
    })
}

/// Environment exposed to hook commands
fn hook_vars(call: &HookCall<'_>) -> Result<HashMap<String, String>> {
    let package = call.package;
    let mut vars = HashMap::new();
    vars.insert("PACKAGE_NAME".to_string(), package.name()?);
    vars.insert("PACKAGE_SLUG".to_string(), package.slug().to_string());
    vars.insert("PACKAGE_DIR".to_string(), package.dir().to_string());
    vars.insert("HOOK_NAME".to_string(), call.name.to_string());

    for (name, value) in call.params {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        vars.insert(name.to_uppercase(), rendered);
    }
    Ok(vars)
}

/// Substitute ${VAR_NAME} patterns in a string with context variables.
///
/// One left-to-right pass: substituted text is never rescanned, and unknown
/// names are left as written.
fn substitute_vars(input: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
