//! Config CLI commands.
//!
//! Commands for managing the pixellwp configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output::{format_bool, print_heading, print_json};
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{
    ConfigError, Preferences, WallpaperSettings, config_paths, keys, load_preferences_from_path,
    resolve_config_path,
};
use crate::error::PixellError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Every option is commented out, so the new file behaves exactly like
    /// having no file at all.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  pixellwp config init              # Create config at default location
  pixellwp config init --force      # Overwrite existing config
  pixellwp config init --path ~/wallpaper.jsonc
  pixellwp config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/pixellwp/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration file search paths.
    ///
    /// Marks the file that is currently in use, if any.
    Path,

    /// Show the effective settings.
    ///
    /// Values missing from the file are shown with their defaults.
    Show {
        /// Output the settings as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, config: Option<&Path>) -> Result<(), PixellError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.as_deref().or(config))
            }
        }
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Show { json } => show_settings(config, *json),
    }
}

fn init_config(force: bool, custom_path: Option<&Path>) -> Result<(), PixellError> {
    let config_path = custom_path.map_or_else(
        || config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc")),
        Path::to_path_buf,
    );

    if config_path.exists() && !force {
        return Err(PixellError::InvalidArguments(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(ConfigError::IoError)?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(())
}

fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'pixellwp config init' to create one.");
    }
}

/// Reads the snapshot behind `config`, treating a missing file as empty.
fn load_snapshot(config: Option<&Path>) -> Result<(PathBuf, Preferences), PixellError> {
    let path = resolve_config_path(config);
    match load_preferences_from_path(&path) {
        Ok(prefs) => Ok((path, prefs)),
        Err(ConfigError::NotFound) => Ok((path, Preferences::new())),
        Err(err) => Err(err.into()),
    }
}

fn show_settings(config: Option<&Path>, json: bool) -> Result<(), PixellError> {
    let (path, prefs) = load_snapshot(config)?;
    let settings = WallpaperSettings::read(&prefs, &WallpaperSettings::default());

    if json {
        return print_json(&settings);
    }

    #[derive(Tabled)]
    struct SettingRow {
        #[tabled(rename = "Key")]
        key: &'static str,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Set")]
        set: String,
    }

    let effective = settings.to_preferences();
    let rows: Vec<SettingRow> = keys::ALL
        .iter()
        .copied()
        .map(|key| SettingRow {
            key,
            value: effective.get(key).map_or_else(|| "-".to_string(), ToString::to_string),
            set: format_bool(prefs.get(key).is_some()),
        })
        .collect();

    print_heading(&format!("Settings from {}", path.display()));
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
