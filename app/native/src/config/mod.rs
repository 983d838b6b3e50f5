//! Configuration module for pixellwp.
//!
//! Provides the typed settings view, the flat preference snapshot, the stores
//! the engine persists to and file watching for hot-reloading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod preferences;
pub mod store;
pub mod template;
pub mod types;
mod watcher;

use std::path::{Path, PathBuf};

pub use preferences::Preferences;
pub use store::{
    ConfigChange, ConfigListener, ConfigStore, FileStore, MemoryStore, Subscription, subscribe,
};
pub use types::{
    ConfigError, ImageMode, WallpaperSettings, config_paths, find_config_path, keys,
    load_preferences_from_path,
};
pub use watcher::watch_config_file;

use crate::platform::path::expand;

/// Resolves the configuration file to use.
///
/// A custom path (from `--config`) wins. Otherwise the first existing file in
/// [`config_paths`] is used, falling back to the preferred location.
#[must_use]
pub fn resolve_config_path(custom: Option<&Path>) -> PathBuf {
    if let Some(path) = custom {
        return expand(&path.to_string_lossy());
    }

    find_config_path()
        .or_else(|| config_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_path_prefers_custom() {
        let path = resolve_config_path(Some(Path::new("/tmp/pixellwp.jsonc")));
        assert_eq!(path, PathBuf::from("/tmp/pixellwp.jsonc"));
    }

    #[test]
    fn test_resolve_config_path_expands_tilde() {
        let path = resolve_config_path(Some(Path::new("~/pixellwp.jsonc")));
        assert!(!path.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_resolve_config_path_default_is_config_file() {
        let path = resolve_config_path(None);
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name == "config.jsonc" || name == "config.json");
    }
}
