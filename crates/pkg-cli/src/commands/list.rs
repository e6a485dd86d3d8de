//! List and show discovered packages

use colored::Colorize;
use pkg_core::{Fallback, Loader, Package};
use serde::Serialize;
use serde_json::Value;

use crate::context::find_package;
use crate::error::Result;

/// A package as printed by `list --json` and `show --json`
#[derive(Debug, Serialize)]
pub struct PackageSummary {
    pub slug: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub extends: Option<String>,
    pub root: String,
    pub dir: String,
    pub bootstrapped: bool,
}

impl PackageSummary {
    pub fn from_package(package: &Package) -> Result<Self> {
        Ok(Self {
            slug: package.slug().to_string(),
            name: optional_string(package, "name")?,
            version: optional_string(package, "version")?,
            extends: package.extends()?,
            root: package.root_name().to_string(),
            dir: package.dir().to_string(),
            bootstrapped: package.is_bootstrapped(),
        })
    }
}

fn optional_string(package: &Package, key: &str) -> Result<Option<String>> {
    let value = package.config(Some(key), Fallback::Value(Value::Null))?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Run the list command
pub fn run_list(loader: &Loader, root_name: Option<&str>, json: bool) -> Result<()> {
    let packages = match root_name {
        Some(name) => loader.get_group(name)?,
        None => loader.get_all()?,
    };

    let summaries = packages
        .iter()
        .map(|package| PackageSummary::from_package(package))
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", format!("Packages ({})", loader.kind()).bold());
    println!();

    if summaries.is_empty() {
        println!("  {}", "No packages found.".dimmed());
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "  {:<28} {:<16} {}",
            summary.slug.green(),
            summary.name.as_deref().unwrap_or("-"),
            summary.version.as_deref().unwrap_or("-").dimmed()
        );
    }

    println!();
    println!("{} {} packages", "Total:".dimmed(), summaries.len());
    Ok(())
}

/// Run the show command
pub fn run_show(loader: &Loader, slug: &str, json: bool) -> Result<()> {
    let package = find_package(loader, slug)?;
    let summary = PackageSummary::from_package(&package)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {}", "=>".blue().bold(), summary.slug.cyan());
    println!("   {} {}", "Name:".dimmed(), summary.name.as_deref().unwrap_or("-"));
    println!(
        "   {} {}",
        "Version:".dimmed(),
        summary.version.as_deref().unwrap_or("-")
    );
    println!(
        "   {} {}",
        "Extends:".dimmed(),
        summary.extends.as_deref().unwrap_or("-")
    );
    println!("   {} {}", "Root:".dimmed(), summary.root);
    println!("   {} {}", "Directory:".dimmed(), summary.dir);
    println!("   {} {}", "Bootstrapped:".dimmed(), summary.bootstrapped);
    Ok(())
}
