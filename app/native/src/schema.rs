//! JSON Schemas for the configuration file and the catalog manifest.

use crate::config::WallpaperSettings;
use crate::wallpaper::catalog::Manifest;

/// Generates the JSON Schema for the configuration file.
#[must_use]
pub fn generate_schema() -> schemars::Schema { schemars::schema_for!(WallpaperSettings) }

/// Generates the JSON Schema for catalog manifests.
#[must_use]
pub fn generate_manifest_schema() -> schemars::Schema { schemars::schema_for!(Manifest) }

/// Pretty-printed configuration schema.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

/// Pretty-printed manifest schema.
#[must_use]
pub fn print_manifest_schema() -> String {
    serde_json::to_string_pretty(&generate_manifest_schema()).unwrap_or_default()
}
