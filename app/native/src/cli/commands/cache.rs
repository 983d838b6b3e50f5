//! Cache CLI commands.

use clap::Subcommand;

use crate::cache;
use crate::error::PixellError;

/// Cache subcommands for managing downloaded images.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CacheCommands {
    /// Remove every downloaded image.
    ///
    /// Images are downloaded again the next time they are selected.
    #[command(after_long_help = r#"Examples:
  pixellwp cache clear   # Clear all cached images"#)]
    Clear,

    /// Show the cache directory location and its size.
    #[command(after_long_help = r#"Examples:
  pixellwp cache path    # Print the cache directory path"#)]
    Path,
}

/// Execute cache subcommands.
///
/// # Errors
///
/// Returns an error if the cache cannot be read or removed.
pub fn execute(cmd: &CacheCommands) -> Result<(), PixellError> {
    match cmd {
        CacheCommands::Clear => {
            let cache_dir = cache::get_cache_dir();
            if !cache_dir.exists() {
                println!("Cache directory does not exist. Nothing to clear.");
                return Ok(());
            }

            let freed = cache::clear_cache()
                .map_err(|err| PixellError::CacheError(format!("Failed to clear cache: {err}")))?;
            println!("Cache cleared successfully. Freed {}.", cache::format_bytes(freed));
        }
        CacheCommands::Path => {
            let size = cache::cache_size()
                .map_err(|err| PixellError::CacheError(format!("Failed to read cache: {err}")))?;
            println!("{}", cache::get_cache_dir().display());
            tracing::debug!(size = %cache::format_bytes(size), "cache size");
        }
    }

    Ok(())
}
