//! Configuration types for pixellwp.
//!
//! The configuration file supports JSONC format (JSON with comments). Keys are
//! flat and camelCase so the same names work for the file, the in-memory store
//! and any host preference system.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::preferences::Preferences;
use crate::constants::APP_ID;

/// Configuration key names.
pub mod keys {
    pub const IMAGE_MODE: &str = "imageMode";
    pub const TIMELINE_SELECTOR: &str = "timelineSelector";
    pub const COLLECTION_SELECTOR: &str = "collectionSelector";
    pub const SINGLE_SELECTOR: &str = "singleSelector";
    pub const PARALLAX_ENABLED: &str = "parallaxEnabled";
    pub const OVERRIDE_ENABLED: &str = "overrideEnabled";
    pub const OVERRIDE_DAY_PERCENT: &str = "overrideDayPercent";
    pub const SCALE_FACTOR: &str = "scaleFactor";
    pub const VIEWPORT_LEFT: &str = "viewportLeft";
    pub const VIEWPORT_TOP: &str = "viewportTop";
    pub const VIEWPORT_RIGHT: &str = "viewportRight";
    pub const VIEWPORT_BOTTOM: &str = "viewportBottom";
    pub const LAST_HOUR_CHECKED: &str = "lastHourChecked";

    /// Every key understood by the engine.
    pub const ALL: &[&str] = &[
        IMAGE_MODE,
        TIMELINE_SELECTOR,
        COLLECTION_SELECTOR,
        SINGLE_SELECTOR,
        PARALLAX_ENABLED,
        OVERRIDE_ENABLED,
        OVERRIDE_DAY_PERCENT,
        SCALE_FACTOR,
        VIEWPORT_LEFT,
        VIEWPORT_TOP,
        VIEWPORT_RIGHT,
        VIEWPORT_BOTTOM,
        LAST_HOUR_CHECKED,
    ];
}

/// Which selector picks the displayed image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ImageMode {
    /// Image content follows the time of day.
    #[default]
    Timeline,
    /// A named set of images rotating every hour.
    Collection,
    /// One fixed image.
    Single,
}

impl ImageMode {
    /// Parses a mode name case-insensitively.
    ///
    /// Unrecognized or blank values fall back to [`ImageMode::Timeline`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "collection" => Self::Collection,
            "single" => Self::Single,
            _ => Self::Timeline,
        }
    }

    /// Canonical name as written to configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::Collection => "Collection",
            Self::Single => "Single",
        }
    }
}

impl std::fmt::Display for ImageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Typed view of one configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WallpaperSettings {
    /// Active image mode: "Timeline", "Collection" or "Single".
    pub image_mode: ImageMode,

    /// Timeline image set used in Timeline mode.
    pub timeline_selector: String,

    /// Collection used in Collection mode. Also drives the hourly rotation.
    pub collection_selector: String,

    /// Image used in Single mode.
    pub single_selector: String,

    /// Shift the viewport horizontally with the home-screen page.
    pub parallax_enabled: bool,

    /// Render timeline images at a fixed time of day instead of wall-clock time.
    pub override_enabled: bool,

    /// Fixed time of day as a percentage of the day (0-100).
    #[schemars(range(min = 0, max = 100))]
    pub override_day_percent: i64,

    /// Zoom applied to the image. Clamped between the cover scale and 10.
    pub scale_factor: f32,

    /// Left edge of the viewport in image pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_left: Option<i32>,

    /// Top edge of the viewport in image pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_top: Option<i32>,

    /// Right edge of the viewport in image pixels. Defaults to the image width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_right: Option<i32>,

    /// Bottom edge of the viewport in image pixels. Defaults to the image height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_bottom: Option<i32>,

    /// Hour of day (0-23) at which the collection rotation last ran.
    #[schemars(range(min = 0, max = 23))]
    pub last_hour_checked: u32,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            image_mode: ImageMode::Timeline,
            timeline_selector: "V26".to_string(),
            collection_selector: "Seascape".to_string(),
            single_selector: "CORAL".to_string(),
            parallax_enabled: true,
            override_enabled: false,
            override_day_percent: 50,
            scale_factor: 5.3,
            viewport_left: None,
            viewport_top: None,
            viewport_right: None,
            viewport_bottom: None,
            last_hour_checked: 0,
        }
    }
}

impl WallpaperSettings {
    /// Reads every key from `prefs`, keeping the value from `fallback` for
    /// any key that is absent or malformed.
    #[must_use]
    pub fn read(prefs: &Preferences, fallback: &Self) -> Self {
        let image_mode = prefs
            .get_str(keys::IMAGE_MODE)
            .map_or(fallback.image_mode, ImageMode::parse);

        Self {
            image_mode,
            timeline_selector: prefs.string(keys::TIMELINE_SELECTOR, &fallback.timeline_selector),
            collection_selector: prefs
                .string(keys::COLLECTION_SELECTOR, &fallback.collection_selector),
            single_selector: prefs.string(keys::SINGLE_SELECTOR, &fallback.single_selector),
            parallax_enabled: prefs.bool(keys::PARALLAX_ENABLED, fallback.parallax_enabled),
            override_enabled: prefs.bool(keys::OVERRIDE_ENABLED, fallback.override_enabled),
            override_day_percent: prefs
                .int(keys::OVERRIDE_DAY_PERCENT, fallback.override_day_percent),
            scale_factor: prefs.float(keys::SCALE_FACTOR, fallback.scale_factor),
            viewport_left: prefs.opt_i32(keys::VIEWPORT_LEFT).or(fallback.viewport_left),
            viewport_top: prefs.opt_i32(keys::VIEWPORT_TOP).or(fallback.viewport_top),
            viewport_right: prefs.opt_i32(keys::VIEWPORT_RIGHT).or(fallback.viewport_right),
            viewport_bottom: prefs.opt_i32(keys::VIEWPORT_BOTTOM).or(fallback.viewport_bottom),
            last_hour_checked: prefs
                .opt_hour(keys::LAST_HOUR_CHECKED)
                .unwrap_or(fallback.last_hour_checked),
        }
    }

    /// Selector string for `mode`.
    #[must_use]
    pub fn selector_for(&self, mode: ImageMode) -> &str {
        match mode {
            ImageMode::Timeline => &self.timeline_selector,
            ImageMode::Collection => &self.collection_selector,
            ImageMode::Single => &self.single_selector,
        }
    }

    /// Selector string for the active mode.
    #[must_use]
    pub fn active_selector(&self) -> &str { self.selector_for(self.image_mode) }

    /// Whether every selector is blank (first run).
    #[must_use]
    pub fn has_no_selectors(&self) -> bool {
        self.timeline_selector.trim().is_empty()
            && self.collection_selector.trim().is_empty()
            && self.single_selector.trim().is_empty()
    }

    /// Converts the settings to a flat preference snapshot.
    #[must_use]
    pub fn to_preferences(&self) -> Preferences {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Preferences::from(map),
            _ => Preferences::default(),
        }
    }
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/pixellwp/config.jsonc \
         or the platform configuration directory"
    )]
    NotFound,
    /// The configuration file exists but could not be read or written.
    #[error("Failed to access configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The configuration file is valid JSON but not an object.
    #[error("Configuration root must be an object: {0}")]
    NotAnObject(PathBuf),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/pixellwp/config.jsonc` or `config.json` (if set)
/// 2. `~/.config/pixellwp/config.jsonc` or `config.json`
/// 3. The platform configuration directory (e.g. `~/Library/Application Support`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join(APP_ID));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join(APP_ID));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join(APP_ID));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_check {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Returns the first configuration file that exists.
#[must_use]
pub fn find_config_path() -> Option<PathBuf> { config_paths().into_iter().find(|p| p.exists()) }

/// Loads a preference snapshot from a JSONC file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read, `ConfigError::ParseError`
/// for invalid JSON and `ConfigError::NotAnObject` for a non-object root.
pub fn load_preferences_from_path(path: &Path) -> Result<Preferences, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let value: serde_json::Value = serde_json::from_reader(reader)?;

    match value {
        serde_json::Value::Object(map) => Ok(Preferences::from(map)),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}
