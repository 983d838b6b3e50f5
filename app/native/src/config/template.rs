//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// pixellwp Configuration File
// ===========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// The engine writes back to this file when the viewport or scale changes,
// and reloads it automatically when you edit it.

{
  // ============================================================================
  // Image Selection
  // ============================================================================
  // Active mode: "Timeline", "Collection" or "Single"
  // "imageMode": "Timeline",
  //
  // Timeline image set (content follows the time of day)
  // "timelineSelector": "V26",
  //
  // Collection rotated every hour
  // "collectionSelector": "Seascape",
  //
  // Image shown in Single mode
  // "singleSelector": "CORAL",

  // ============================================================================
  // Time Override
  // ============================================================================
  // Render timeline images at a fixed time of day
  // "overrideEnabled": false,
  //
  // Fixed time of day as a percentage of the day (0-100)
  // "overrideDayPercent": 50,

  // ============================================================================
  // Viewport
  // ============================================================================
  // Shift the image with the home-screen page
  // "parallaxEnabled": true,
  //
  // Zoom level, clamped between the cover scale and 10
  // "scaleFactor": 5.3

  // Visible rectangle in image pixels (written by the engine)
  // "viewportLeft": 0,
  // "viewportTop": 0,
  // "viewportRight": 0,
  // "viewportBottom": 0
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;
    use crate::config::types::load_preferences_from_path;

    #[test]
    fn test_generate_config_template_is_valid_jsonc() {
        let template = generate_config_template();
        let stripped = json_comments::StripComments::new(template.as_bytes());
        let value: serde_json::Value = serde_json::from_reader(stripped).unwrap();
        assert!(value.as_object().is_some_and(serde_json::Map::is_empty));
    }

    #[test]
    fn test_generate_config_template_mentions_every_key() {
        let template = generate_config_template();
        for key in keys::ALL {
            assert!(template.contains(&format!("\"{key}\"")), "template misses {key}");
        }
    }

    #[test]
    fn test_create_config_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.jsonc");
        create_config_file(&path).unwrap();

        let prefs = load_preferences_from_path(&path).unwrap();
        assert!(prefs.is_empty());
    }
}
