//! Manual time-of-day override for timeline images.

use super::image::TimelineImage;
use crate::constants::DAY_MILLIS;

/// Milliseconds scrubbed per pixel of horizontal pan.
pub const MILLIS_PER_PAN_PIXEL: i64 = 10_000;

/// Holds the override flag and offset, and pushes them onto timeline images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeOverrideController {
    enabled: bool,
    offset_millis: i64,
}

impl TimeOverrideController {
    #[must_use]
    pub const fn new(enabled: bool, offset_millis: i64) -> Self { Self { enabled, offset_millis } }

    /// Builds the controller from the configured flag and day percentage.
    #[must_use]
    pub const fn from_settings(enabled: bool, day_percent: i64) -> Self {
        Self::new(enabled, Self::from_day_percent(day_percent).rem_euclid(DAY_MILLIS))
    }

    #[must_use]
    pub const fn enabled(&self) -> bool { self.enabled }

    #[must_use]
    pub const fn offset_millis(&self) -> i64 { self.offset_millis }

    /// Converts a percentage of the day to milliseconds since midnight.
    ///
    /// The percentage is clamped to `0..=100`.
    #[must_use]
    pub const fn from_day_percent(percent: i64) -> i64 {
        let percent = if percent < 0 {
            0
        } else if percent > 100 {
            100
        } else {
            percent
        };
        DAY_MILLIS * percent / 100
    }

    /// Offset after a horizontal pan of `distance_x` pixels, wrapped into one day.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_pan_gesture(distance_x: f32, previous: i64) -> i64 {
        if !distance_x.is_finite() {
            return previous.rem_euclid(DAY_MILLIS);
        }
        // Reduce before multiplying; steps of a full day are a no-op after wrapping
        let steps = (distance_x.round() as i64).rem_euclid(DAY_MILLIS / MILLIS_PER_PAN_PIXEL);
        (previous.rem_euclid(DAY_MILLIS) + steps * MILLIS_PER_PAN_PIXEL).rem_euclid(DAY_MILLIS)
    }

    /// Applies configured values to the current image.
    ///
    /// Returns `true` when the image was updated. The held values always follow
    /// the configuration so the next loaded timeline image gets them.
    pub fn reconcile(
        &mut self,
        enabled: bool,
        offset_millis: i64,
        image: Option<&mut TimelineImage>,
    ) -> bool {
        // 100% of the day is midnight again; images hold wrapped values
        let offset_millis = offset_millis.rem_euclid(DAY_MILLIS);
        let Some(image) = image else {
            self.enabled = enabled;
            self.offset_millis = offset_millis;
            return false;
        };

        let current = image.override_time().unwrap_or(self.offset_millis);
        if enabled == self.enabled && offset_millis == current {
            return false;
        }

        self.enabled = enabled;
        self.offset_millis = offset_millis;
        if enabled {
            image.set_time_override(offset_millis);
        } else {
            image.stop_time_override();
        }

        tracing::debug!(enabled, offset_millis, image = %image.info, "time override updated");
        true
    }

    /// Re-applies an active override to a freshly loaded image.
    pub const fn reassert(&self, image: &mut TimelineImage) {
        if self.enabled {
            image.set_time_override(self.offset_millis);
        }
    }

    /// Moves the override by a pan gesture and pushes it onto `image`.
    pub fn scrub(&mut self, distance_x: f32, image: &mut TimelineImage) -> i64 {
        self.offset_millis = Self::from_pan_gesture(distance_x, self.offset_millis);
        image.set_time_override(self.offset_millis);
        self.offset_millis
    }
}
