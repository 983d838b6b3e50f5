//! CLI command definitions using Clap.
//!
//! Commands are organized into domain-specific submodules:
//!
//! - `cache` - Image cache management
//! - `catalog` - Catalog manifest inspection
//! - `config_cmd` - Configuration file management
//! - `run` - Headless engine session

use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::constants::APP_ID;
use crate::error::PixellError;
use crate::schema;

pub mod cache;
pub mod catalog;
pub mod config_cmd;
pub mod run;

pub use cache::CacheCommands;
pub use catalog::CatalogCommands;
pub use config_cmd::ConfigCommands;
pub use run::RunArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the catalog manifest looked up next to the config file.
pub const DEFAULT_MANIFEST_NAME: &str = "catalog.jsonc";

/// pixellwp - Live wallpaper engine.
#[derive(Parser, Debug)]
#[command(name = "pixellwp")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run a headless engine session until Ctrl-C.
    ///
    /// Frames are logged instead of drawn. Use `RUST_LOG=pixellwp=debug` to
    /// follow every frame.
    Run(RunArgs),

    /// Configuration file management commands.
    ///
    /// Initialize, locate and inspect the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Catalog manifest commands.
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Cache management commands.
    ///
    /// Manage the downloaded image cache.
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema {
        /// Output the catalog manifest schema instead.
        #[arg(long)]
        manifest: bool,
    },

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(pixellwp completions --shell zsh)"
    ///   pixellwp completions --shell fish > ~/.config/fish/completions/pixellwp.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> { self.config.as_deref() }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), PixellError> {
        let config = self.config_path();

        match &self.command {
            Commands::Run(args) => run::execute(args, config),
            Commands::Config(cmd) => config_cmd::execute(cmd, config),
            Commands::Catalog(cmd) => catalog::execute(cmd, config),
            Commands::Cache(cmd) => cache::execute(cmd),
            Commands::Schema { manifest } => {
                let output =
                    if *manifest { schema::print_manifest_schema() } else { schema::print_schema() };
                println!("{output}");
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_ID, &mut io::stdout());
    }
}

/// Resolves the manifest to use: an explicit path, or `catalog.jsonc` next to
/// the configuration file.
#[must_use]
pub fn manifest_path(explicit: Option<&Path>, config: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return crate::platform::path::expand(&path.to_string_lossy());
    }

    let config_file = crate::config::resolve_config_path(config);
    config_file
        .parent()
        .map_or_else(|| PathBuf::from(DEFAULT_MANIFEST_NAME), |dir| dir.join(DEFAULT_MANIFEST_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["pixellwp", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { manifest: false }));
    }

    #[test]
    fn test_cli_parses_manifest_schema() {
        let cli = Cli::try_parse_from(["pixellwp", "schema", "--manifest"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { manifest: true }));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["pixellwp", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_global_config() {
        let cli = Cli::try_parse_from(["pixellwp", "cache", "path", "--config", "/tmp/p.jsonc"])
            .unwrap();
        assert_eq!(cli.config_path(), Some(Path::new("/tmp/p.jsonc")));
        assert!(matches!(cli.command, Commands::Cache(CacheCommands::Path)));
    }

    #[test]
    fn test_cli_parses_cache_clear() {
        let cli = Cli::try_parse_from(["pixellwp", "cache", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommands::Clear)));
    }

    #[test]
    fn test_cli_parses_run_defaults() {
        let cli = Cli::try_parse_from(["pixellwp", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(!args.preview);
                assert!(args.manifest.is_none());
                assert!(args.width.is_none());
                assert!(args.height.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parses_run_with_surface() {
        let cli = Cli::try_parse_from([
            "pixellwp", "run", "--preview", "--width", "1080", "--height", "1920",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(args.preview);
                assert_eq!(args.width, Some(1080));
                assert_eq!(args.height, Some(1920));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_rejects_width_without_height() {
        assert!(Cli::try_parse_from(["pixellwp", "run", "--width", "1080"]).is_err());
    }

    #[test]
    fn test_cli_parses_catalog_list() {
        let cli =
            Cli::try_parse_from(["pixellwp", "catalog", "list", "--manifest", "cat.jsonc"]).unwrap();
        match cli.command {
            Commands::Catalog(CatalogCommands::List { manifest, json }) => {
                assert_eq!(manifest, Some(PathBuf::from("cat.jsonc")));
                assert!(!json);
            }
            _ => panic!("Expected Catalog List command"),
        }
    }

    #[test]
    fn test_cli_parses_config_show_json() {
        let cli = Cli::try_parse_from(["pixellwp", "config", "show", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show { json: true })));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["pixellwp", "wallpaper"]).is_err());
    }

    #[test]
    fn test_manifest_path_prefers_explicit() {
        let path = manifest_path(Some(Path::new("/tmp/cat.jsonc")), None);
        assert_eq!(path, PathBuf::from("/tmp/cat.jsonc"));
    }

    #[test]
    fn test_manifest_path_sits_next_to_config() {
        let path = manifest_path(None, Some(Path::new("/tmp/pixellwp/config.jsonc")));
        assert_eq!(path, PathBuf::from("/tmp/pixellwp/catalog.jsonc"));
    }
}
