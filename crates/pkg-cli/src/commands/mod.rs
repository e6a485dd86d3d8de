//! Command implementations for pkg-cli

pub mod assets;
pub mod config;
pub mod lifecycle;
pub mod list;

pub use assets::{run_asset, run_clear_assets};
pub use config::{run_config, run_refresh};
pub use lifecycle::{run_autoload, run_operation};
pub use list::{run_list, run_show};
