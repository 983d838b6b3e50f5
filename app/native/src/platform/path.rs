//! Path utilities for shell-like path expansion.
//!
//! Catalog manifests reference image sources either absolutely, relative to
//! the user's home (`~/…`), or relative to the manifest itself.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Blank input yields an empty path. Relative paths are returned unchanged.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands `path` and resolves it against `base_dir` when still relative.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_blank_is_empty() {
        assert_eq!(expand(""), PathBuf::new());
        assert_eq!(expand("   "), PathBuf::new());
    }

    #[test]
    fn test_expand_keeps_absolute_and_relative() {
        assert_eq!(expand("/srv/images/v26.bmp"), PathBuf::from("/srv/images/v26.bmp"));
        assert_eq!(expand("images/v26.bmp"), PathBuf::from("images/v26.bmp"));
    }

    #[test]
    fn test_expand_tilde() {
        let result = expand("~/wallpapers/coral.bmp");
        assert!(!result.to_string_lossy().starts_with('~'));
        assert!(result.to_string_lossy().ends_with("wallpapers/coral.bmp"));
    }

    #[test]
    fn test_expand_and_resolve_relative_joins_base() {
        let resolved = expand_and_resolve("images/v26.bmp", Path::new("/etc/pixellwp"));
        assert_eq!(resolved, PathBuf::from("/etc/pixellwp/images/v26.bmp"));
    }

    #[test]
    fn test_expand_and_resolve_absolute_ignores_base() {
        let resolved = expand_and_resolve("/abs/v26.bmp", Path::new("/etc/pixellwp"));
        assert_eq!(resolved, PathBuf::from("/abs/v26.bmp"));
    }

    #[test]
    fn test_expand_and_resolve_blank_stays_empty() {
        assert_eq!(expand_and_resolve(" ", Path::new("/base")), PathBuf::new());
    }
}
