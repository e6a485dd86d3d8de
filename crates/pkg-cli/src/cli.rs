//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Package loader - discover packages, resolve their assets and run their hooks
#[derive(Parser, Debug)]
#[command(name = "pkg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Loader settings file (defaults to ./packages.toml when present)
    #[arg(long, global = true, env = "PKG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Additional package root to scan (repeatable)
    #[arg(long = "root", global = true)]
    pub roots: Vec<PathBuf>,

    /// Directory assets are materialized into
    #[arg(long, global = true)]
    pub public_dir: Option<PathBuf>,

    /// URL the public directory is served under
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List discovered packages
    List {
        /// Only list packages from this root
        #[arg(long)]
        root_name: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show details for one package
    Show {
        /// Package slug (vendor/name)
        slug: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Look up a dotted path in a package's metadata
    ///
    /// Examples:
    ///   pkg config foolz/fake                 # whole document
    ///   pkg config foolz/fake extra.extends
    ///   pkg config foolz/fake extra.revision --default 0
    ///   pkg config foolz/child extra.color --inherited
    Config {
        /// Package slug (vendor/name)
        slug: String,

        /// Dotted path, e.g. extra.extends
        path: Option<String>,

        /// Value returned when the path is missing (JSON, or a plain string)
        #[arg(long)]
        default: Option<String>,

        /// Fall back along the extension chain
        #[arg(long)]
        inherited: bool,
    },

    /// Print the URL of an asset, following the extension chain
    Asset {
        /// Package slug (vendor/name)
        slug: String,

        /// Path relative to the package's assets directory
        path: String,
    },

    /// Delete a package's materialized public assets
    ClearAssets {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Delete a package's cached metadata
    Refresh {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Run a package's install hooks
    Install {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Run a package's uninstall hooks
    Uninstall {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Run a package's execute hooks
    Execute {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Run a package's upgrade hooks
    Upgrade {
        /// Package slug (vendor/name)
        slug: String,
    },

    /// Print the namespace mappings a package forwards to the autoloader
    Autoload {
        /// Package slug (vendor/name)
        slug: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Outputs completion script for your shell.
    ///
    /// Examples:
    ///   pkg completions bash > ~/.local/share/bash-completion/completions/pkg
    ///   pkg completions zsh > ~/.zfunc/_pkg
    ///   pkg completions fish > ~/.config/fish/completions/pkg.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["pkg"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_global_options_after_command() {
        let cli = Cli::parse_from([
            "pkg",
            "list",
            "--root",
            "themes",
            "--root",
            "plugins",
            "--base-url",
            "https://cdn.example.com",
            "-v",
        ]);
        assert_eq!(
            cli.roots,
            vec![PathBuf::from("themes"), PathBuf::from("plugins")]
        );
        assert_eq!(cli.base_url.as_deref(), Some("https://cdn.example.com"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_list_command() {
        let cli = Cli::parse_from(["pkg", "list", "--root-name", "themes", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::List {
                root_name: Some("themes".to_string()),
                json: true
            })
        );
    }

    #[test]
    fn parse_config_command() {
        let cli = Cli::parse_from([
            "pkg",
            "config",
            "foolz/fake",
            "extra.revision",
            "--default",
            "0",
        ]);
        match cli.command {
            Some(Commands::Config {
                slug,
                path,
                default,
                inherited,
            }) => {
                assert_eq!(slug, "foolz/fake");
                assert_eq!(path.as_deref(), Some("extra.revision"));
                assert_eq!(default.as_deref(), Some("0"));
                assert!(!inherited);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn parse_asset_command() {
        let cli = Cli::parse_from(["pkg", "asset", "foolz/fake", "css/site.css"]);
        assert_eq!(
            cli.command,
            Some(Commands::Asset {
                slug: "foolz/fake".to_string(),
                path: "css/site.css".to_string()
            })
        );
    }

    #[test]
    fn parse_lifecycle_commands() {
        for (name, expected) in [
            ("install", Commands::Install { slug: "a/b".into() }),
            ("uninstall", Commands::Uninstall { slug: "a/b".into() }),
            ("execute", Commands::Execute { slug: "a/b".into() }),
            ("upgrade", Commands::Upgrade { slug: "a/b".into() }),
        ] {
            let cli = Cli::parse_from(["pkg", name, "a/b"]);
            assert_eq!(cli.command, Some(expected));
        }
    }

    #[test]
    fn parse_completions_command() {
        let cli = Cli::parse_from(["pkg", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }
}
