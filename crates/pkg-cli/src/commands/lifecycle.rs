//! Lifecycle and autoload commands

use colored::Colorize;
use pkg_core::{AutoloadMap, HookRegistry, Loader, Operation};
use serde::Serialize;

use crate::context::find_package;
use crate::error::Result;

/// Run install, uninstall, execute or upgrade on a package
pub fn run_operation(loader: &Loader, slug: &str, operation: Operation) -> Result<()> {
    let package = find_package(loader, slug)?;
    let mut hooks = HookRegistry::new();

    let ran = match operation {
        Operation::Execute => package.execute(&mut hooks)?,
        Operation::Install => package.install(&mut hooks)?,
        Operation::Uninstall => package.uninstall(&mut hooks)?,
        Operation::Upgrade => package.upgrade(&mut hooks)?,
    };

    println!(
        "{} {} {} ({} hook{})",
        "=>".blue().bold(),
        operation.to_string().green(),
        package.slug().cyan(),
        ran,
        if ran == 1 { "" } else { "s" }
    );
    Ok(())
}

#[derive(Serialize)]
struct MappingOutput<'a> {
    standard: String,
    namespace: &'a str,
    path: &'a str,
}

/// Run the autoload command
pub fn run_autoload(loader: &Loader, slug: &str, json: bool) -> Result<()> {
    let package = find_package(loader, slug)?;
    let mut map = AutoloadMap::new();
    package.enable_autoloader(&mut map)?;

    if json {
        let output: Vec<MappingOutput<'_>> = map
            .entries()
            .iter()
            .map(|entry| MappingOutput {
                standard: entry.standard.to_string(),
                namespace: &entry.namespace,
                path: entry.path.as_str(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if map.is_empty() {
        println!("  {}", "No autoload mappings.".dimmed());
        return Ok(());
    }

    for entry in map.entries() {
        println!(
            "  {:<6} {:<32} {}",
            entry.standard.to_string().yellow(),
            entry.namespace.cyan(),
            entry.path
        );
    }
    Ok(())
}
