//! Command-line interface for pixellwp.
//!
//! Hosts a headless engine session (`pixellwp run`) and the tooling around it:
//! configuration, catalog inspection, cache management and shell completions.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::PixellError;

/// Parses command-line arguments and executes the selected command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), PixellError> {
    let cli = Cli::parse();
    cli.execute()
}
