//! Metadata lookups

use colored::Colorize;
use pkg_core::{Fallback, Loader};
use serde_json::Value;

use crate::context::find_package;
use crate::error::Result;

/// Parse `--default`: JSON when it parses, a plain string otherwise.
pub fn parse_default(raw: Option<&str>) -> Fallback {
    match raw {
        None => Fallback::NoFallback,
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => Fallback::Value(value),
            Err(_) => Fallback::value(raw),
        },
    }
}

/// Run the config command
pub fn run_config(
    loader: &Loader,
    slug: &str,
    path: Option<&str>,
    default: Option<&str>,
    inherited: bool,
) -> Result<()> {
    let package = find_package(loader, slug)?;
    let fallback = parse_default(default);

    let value = match (path, inherited) {
        (Some(path), true) => package.inherited_config(path, fallback)?,
        _ => package.config(path, fallback)?,
    };

    match value {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

/// Run the refresh command
pub fn run_refresh(loader: &Loader, slug: &str) -> Result<()> {
    let package = find_package(loader, slug)?;
    package.refresh_config()?;
    println!(
        "{} Cached metadata cleared for {}",
        "=>".blue().bold(),
        package.slug().cyan()
    );
    Ok(())
}
