//! Reconciles configuration snapshots with the engine's controllers.
//!
//! Live sessions reload everything when they become visible. Preview sessions
//! react to each change and only re-resolve the image when the active mode or
//! its selector changed.

use super::image::TimelineImage;
use super::time_override::TimeOverrideController;
use super::viewport::{Viewport, ViewportController};
use crate::config::{Preferences, WallpaperSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSyncBridge {
    settings: WallpaperSettings,
}

impl PreferenceSyncBridge {
    #[must_use]
    pub const fn new(settings: WallpaperSettings) -> Self { Self { settings } }

    /// Settings as of the last reconciliation.
    #[must_use]
    pub const fn settings(&self) -> &WallpaperSettings { &self.settings }

    /// Records the hour the hourly check last ran at.
    pub const fn record_hour(&mut self, hour: u32) { self.settings.last_hour_checked = hour; }

    /// Full reload. Returns whether the image should be re-resolved.
    pub fn live_reload(
        &mut self,
        prefs: &Preferences,
        viewport: &mut ViewportController,
        time_override: &mut TimeOverrideController,
        image: Option<&mut TimelineImage>,
    ) -> bool {
        let next = WallpaperSettings::read(prefs, &self.settings);

        push_viewport(&next, viewport);
        time_override.reconcile(
            next.override_enabled,
            TimeOverrideController::from_day_percent(next.override_day_percent),
            image,
        );

        let resolve = !next.active_selector().trim().is_empty();
        tracing::debug!(mode = %next.image_mode, resolve, "live reload");
        self.settings = next;
        resolve
    }

    /// Incremental reconciliation for preview sessions. Returns whether the
    /// image should be re-resolved.
    pub fn preview_reconcile(
        &mut self,
        prefs: &Preferences,
        viewport: &mut ViewportController,
        time_override: &mut TimeOverrideController,
        image: Option<&mut TimelineImage>,
    ) -> bool {
        let next = WallpaperSettings::read(prefs, &self.settings);

        push_viewport(&next, viewport);
        if next.override_enabled != self.settings.override_enabled
            || next.override_day_percent != self.settings.override_day_percent
        {
            time_override.reconcile(
                next.override_enabled,
                TimeOverrideController::from_day_percent(next.override_day_percent),
                image,
            );
        }

        let resolve = !next.active_selector().trim().is_empty()
            && (next.image_mode != self.settings.image_mode
                || next.active_selector() != self.settings.active_selector());
        tracing::debug!(mode = %next.image_mode, resolve, "preview reconcile");
        self.settings = next;
        resolve
    }
}

/// Pushes rectangle, parallax and scale. Missing edges keep the current viewport.
#[allow(clippy::cast_precision_loss)]
fn push_viewport(settings: &WallpaperSettings, viewport: &mut ViewportController) {
    let current = viewport.viewport();
    let edge = |value: Option<i32>, fallback: f32| value.map_or(fallback, |v| v as f32);
    let rect = Viewport::new(
        edge(settings.viewport_left, current.left),
        edge(settings.viewport_top, current.top),
        edge(settings.viewport_right, current.right),
        edge(settings.viewport_bottom, current.bottom),
    );
    viewport.apply_preferences(rect, settings.parallax_enabled, settings.scale_factor);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::{ImageMode, keys};
    use crate::wallpaper::image::ImageInfo;

    struct Fixture {
        bridge: PreferenceSyncBridge,
        viewport: ViewportController,
        time_override: TimeOverrideController,
        image: TimelineImage,
    }

    fn fixture() -> Fixture {
        let settings = WallpaperSettings::default();
        let mut viewport = ViewportController::new(settings.scale_factor, true);
        viewport.image_changed(2000, 3000);
        viewport.surface_changed(1080, 1920);
        Fixture {
            bridge: PreferenceSyncBridge::new(settings),
            viewport,
            time_override: TimeOverrideController::default(),
            image: TimelineImage::new(ImageInfo::new("V26", 1, true), 2000, 3000),
        }
    }

    impl Fixture {
        fn preview(&mut self, prefs: &Preferences) -> bool {
            self.bridge.preview_reconcile(
                prefs,
                &mut self.viewport,
                &mut self.time_override,
                Some(&mut self.image),
            )
        }

        fn live(&mut self, prefs: &Preferences) -> bool {
            self.bridge.live_reload(
                prefs,
                &mut self.viewport,
                &mut self.time_override,
                Some(&mut self.image),
            )
        }
    }

    #[test]
    fn test_preview_unchanged_snapshot_never_resolves() {
        let mut f = fixture();
        let prefs = WallpaperSettings::default().to_preferences();
        assert!(!f.preview(&prefs));
        assert!(!f.preview(&prefs));
    }

    #[test]
    fn test_preview_mode_change_resolves() {
        let mut f = fixture();
        let mut prefs = WallpaperSettings::default().to_preferences();
        prefs.set(keys::IMAGE_MODE, "Collection");
        assert!(f.preview(&prefs));
        assert_eq!(f.bridge.settings().image_mode, ImageMode::Collection);
    }

    #[test]
    fn test_preview_inactive_selector_change_does_not_resolve() {
        let mut f = fixture();
        let mut prefs = WallpaperSettings::default().to_preferences();
        prefs.set(keys::SINGLE_SELECTOR, "MOUNTAIN");
        assert!(!f.preview(&prefs));
        assert_eq!(f.bridge.settings().single_selector, "MOUNTAIN");
    }

    #[test]
    fn test_preview_active_selector_change_resolves() {
        let mut f = fixture();
        let mut prefs = WallpaperSettings::default().to_preferences();
        prefs.set(keys::TIMELINE_SELECTOR, "V27");
        assert!(f.preview(&prefs));
    }

    #[test]
    fn test_live_reload_resolves_when_selector_present() {
        let mut f = fixture();
        assert!(f.live(&WallpaperSettings::default().to_preferences()));

        let prefs = Preferences::from_value(json!({ "timelineSelector": "" }));
        assert!(!f.live(&prefs));
    }

    #[test]
    fn test_live_reload_reconciles_override() {
        let mut f = fixture();
        let prefs = Preferences::from_value(json!({
            "overrideEnabled": true,
            "overrideDayPercent": 25,
        }));
        f.live(&prefs);
        assert_eq!(f.image.override_time(), Some(21_600_000));
        assert!(f.time_override.enabled());
    }

    #[test]
    fn test_preview_keeps_scrubbed_override_on_unrelated_change() {
        let mut f = fixture();
        let mut prefs = Preferences::from_value(json!({ "overrideEnabled": true }));
        f.preview(&prefs);
        f.time_override.scrub(5.0, &mut f.image);
        let scrubbed = f.image.override_time();

        prefs.set(keys::SCALE_FACTOR, 2.0);
        f.preview(&prefs);
        assert_eq!(f.image.override_time(), scrubbed);
    }

    #[test]
    fn test_both_modes_push_viewport_values() {
        let mut f = fixture();
        let prefs = Preferences::from_value(json!({
            "parallaxEnabled": false,
            "scaleFactor": 1.0,
            "viewportLeft": 100,
            "viewportTop": 200,
        }));
        assert!(!f.preview(&prefs));
        assert!(!f.viewport.parallax());
        assert!((f.viewport.scale() - 1.0).abs() < 1e-4);
        assert!((f.viewport.viewport().left - 100.0).abs() < 1e-4);
        assert!((f.viewport.viewport().top - 200.0).abs() < 1e-4);

        let prefs = Preferences::from_value(json!({ "parallaxEnabled": true, "scaleFactor": 2.0 }));
        f.live(&prefs);
        assert!(f.viewport.parallax());
        assert!((f.viewport.scale() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_recorded_hour_follows_reload() {
        let mut f = fixture();
        f.bridge.record_hour(4);
        assert_eq!(f.bridge.settings().last_hour_checked, 4);

        // Absent key keeps the recorded hour, a configured one replaces it
        f.live(&Preferences::new());
        assert_eq!(f.bridge.settings().last_hour_checked, 4);
        f.live(&Preferences::from_value(json!({ "lastHourChecked": 9 })));
        assert_eq!(f.bridge.settings().last_hour_checked, 9);
    }

    #[test]
    fn test_malformed_values_keep_held_settings() {
        let mut f = fixture();
        let prefs = Preferences::from_value(json!({ "scaleFactor": "big", "parallaxEnabled": 1 }));
        f.live(&prefs);
        assert!((f.viewport.scale() - 5.3).abs() < 1e-4);
        assert!(f.viewport.parallax());
    }
}
