//! Cache directory utilities.
//!
//! Downloaded wallpaper images live under `{cache_dir}/pixellwp/images`, where
//! `{cache_dir}` is the platform cache directory (`~/.cache` on Linux,
//! `~/Library/Caches` on macOS). Falls back to the system temp directory.

use std::path::{Path, PathBuf};

use crate::constants::APP_ID;

/// Subdirectory holding downloaded catalog images.
pub const IMAGES_SUBDIR: &str = "images";

/// Returns the root cache directory for the application.
#[must_use]
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map_or_else(|| std::env::temp_dir().join(APP_ID), |cache| cache.join(APP_ID))
}

/// Returns a cache subdirectory, e.g. [`IMAGES_SUBDIR`].
#[must_use]
pub fn get_cache_subdir(subdir: &str) -> PathBuf { get_cache_dir().join(subdir) }

/// Clears the entire cache directory.
///
/// Returns the approximate number of bytes freed. A missing directory frees 0 bytes.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or removed.
pub fn clear_cache() -> std::io::Result<u64> { clear_dir(&get_cache_dir()) }

/// Total size of the cache directory in bytes.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn cache_size() -> std::io::Result<u64> {
    let cache_dir = get_cache_dir();
    if !cache_dir.exists() {
        return Ok(0);
    }
    calculate_dir_size(&cache_dir)
}

fn clear_dir(dir: &Path) -> std::io::Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }

    let bytes_freed = calculate_dir_size(dir)?;
    std::fs::remove_dir_all(dir)?;

    Ok(bytes_freed)
}

fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0u64;

    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                total += calculate_dir_size(&path)?;
            } else {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    Ok(total)
}

/// Formats a byte count as a human-readable string like "1.50 MB".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cache_dir_ends_with_app_id() {
        assert!(get_cache_dir().ends_with(APP_ID));
    }

    #[test]
    fn test_get_cache_subdir_is_nested() {
        let path = get_cache_subdir(IMAGES_SUBDIR);
        assert!(path.ends_with(format!("{APP_ID}/{IMAGES_SUBDIR}")));
    }

    #[test]
    fn test_clear_dir_reports_bytes_freed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache");
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("images").join("a.bin"), [0u8; 100]).unwrap();
        std::fs::write(root.join("b.bin"), [0u8; 28]).unwrap();

        assert_eq!(clear_dir(&root).unwrap(), 128);
        assert!(!root.exists());
    }

    #[test]
    fn test_clear_dir_missing_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(clear_dir(&dir.path().join("absent")).unwrap(), 0);
    }

    #[test]
    fn test_format_bytes_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024 + 512 * 1024), "1.50 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }
}
