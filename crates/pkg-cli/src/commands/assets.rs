//! Asset commands

use colored::Colorize;
use pkg_core::Loader;

use crate::context::find_package;
use crate::error::Result;

/// Run the asset command
pub fn run_asset(loader: &Loader, slug: &str, path: &str) -> Result<()> {
    let package = find_package(loader, slug)?;
    let url = package.asset_manager()?.asset_link(path)?;
    println!("{url}");
    Ok(())
}

/// Run the clear-assets command
pub fn run_clear_assets(loader: &Loader, slug: &str) -> Result<()> {
    let package = find_package(loader, slug)?;
    let manager = package.asset_manager()?;

    if manager.clear_assets()? {
        println!(
            "{} Cleared public assets for {}",
            "=>".blue().bold(),
            package.slug().cyan()
        );
    } else {
        println!(
            "{} No public assets for {}",
            "=>".blue().bold(),
            package.slug().cyan()
        );
    }
    Ok(())
}
