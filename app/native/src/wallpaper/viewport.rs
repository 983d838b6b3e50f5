//! Viewport geometry: scale, pan and parallax.
//!
//! The viewport is the crop window into the full-resolution image, in image
//! pixels. Its size is always the screen size divided by the scale factor, and
//! its top-left corner stays within the image.

use serde::{Deserialize, Serialize};

/// Upper bound for the scale factor.
pub const MAX_SCALE: f32 = 10.0;

/// Rectangle in image-pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Viewport {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn width(&self) -> f32 { self.right - self.left }

    #[must_use]
    pub fn height(&self) -> f32 { self.bottom - self.top }

    #[must_use]
    pub fn is_landscape(&self) -> bool { self.width() > self.height() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.width() <= 0.0 || self.height() <= 0.0 }

    /// Rounds each edge for persistence.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_ints(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom].map(|v| v.round() as i32)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.left, self.top, self.right, self.bottom)
    }
}

/// Size of the render surface in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDimensions {
    pub width: u32,
    pub height: u32,
}

impl ScreenDimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }

    #[must_use]
    pub const fn is_known(&self) -> bool { self.width > 0 && self.height > 0 }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    viewport: Viewport,
    scale: f32,
    min_scale: f32,
    screen: ScreenDimensions,
    image_width: u32,
    image_height: u32,
    screen_offset: f32,
    parallax: bool,
}

impl ViewportController {
    #[must_use]
    pub fn new(scale: f32, parallax: bool) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale.min(MAX_SCALE) } else { 1.0 };
        Self {
            viewport: Viewport::default(),
            scale,
            min_scale: 0.0,
            screen: ScreenDimensions::default(),
            image_width: 0,
            image_height: 0,
            screen_offset: 0.0,
            parallax,
        }
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport { self.viewport }

    #[must_use]
    pub const fn scale(&self) -> f32 { self.scale }

    #[must_use]
    pub const fn min_scale(&self) -> f32 { self.min_scale }

    #[must_use]
    pub const fn screen(&self) -> ScreenDimensions { self.screen }

    #[must_use]
    pub const fn image_size(&self) -> (u32, u32) { (self.image_width, self.image_height) }

    #[must_use]
    pub const fn screen_offset(&self) -> f32 { self.screen_offset }

    #[must_use]
    pub const fn parallax(&self) -> bool { self.parallax }

    pub const fn set_parallax(&mut self, enabled: bool) { self.parallax = enabled; }

    /// Sets the home-screen paging position, clamped to `0..=1`.
    pub fn set_screen_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.screen_offset = offset.clamp(0.0, 1.0);
        }
    }

    /// Replaces the rectangle as-is. Use [`Self::pan`] to re-clamp it.
    pub const fn set_viewport(&mut self, viewport: Viewport) { self.viewport = viewport; }

    /// Whether both the image and the screen have known dimensions.
    #[must_use]
    pub const fn has_geometry(&self) -> bool {
        self.screen.is_known() && self.image_width > 0 && self.image_height > 0
    }

    /// Recomputes the smallest scale at which the image still covers the screen.
    #[allow(clippy::cast_precision_loss)]
    pub fn recompute_min_scale(&mut self) {
        if !self.has_geometry() {
            return;
        }

        let by_width = self.screen.width as f32 / self.image_width as f32;
        let by_height = self.screen.height as f32 / self.image_height as f32;
        self.min_scale = by_width.max(by_height);
        self.scale = self.clamp_scale(self.scale);
    }

    // Lower bound wins when it exceeds MAX_SCALE, so the image still covers the screen
    fn clamp_scale(&self, scale: f32) -> f32 { scale.min(MAX_SCALE).max(self.min_scale) }

    /// Multiplies the scale by a pinch delta.
    ///
    /// Non-finite or non-positive multipliers are ignored.
    pub fn set_scale(&mut self, multiplier: f32) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return;
        }
        self.scale = self.clamp_scale(self.scale * multiplier);
        self.pan(0.0, 0.0);
    }

    /// Assigns an absolute scale, e.g. from configuration.
    pub fn restore_scale(&mut self, value: f32) {
        if !value.is_finite() || value <= 0.0 {
            return;
        }
        self.scale = self.clamp_scale(value);
        self.pan(0.0, 0.0);
    }

    /// Moves the viewport by a screen-space distance.
    ///
    /// The top-left corner is clamped into the image and the size follows the
    /// current scale. Skipped while the image or screen size is unknown.
    #[allow(clippy::cast_precision_loss)]
    pub fn pan(&mut self, distance_x: f32, distance_y: f32) {
        if !self.has_geometry() {
            return;
        }

        let distance_x = if distance_x.is_finite() { distance_x } else { 0.0 };
        let distance_y = if distance_y.is_finite() { distance_y } else { 0.0 };

        let width = self.screen.width as f32 / self.scale;
        let height = self.screen.height as f32 / self.scale;
        let overlap_x = (self.image_width as f32 - width).max(0.0);
        let overlap_y = (self.image_height as f32 - height).max(0.0);

        let left = (self.viewport.left + distance_x / self.scale).min(overlap_x).max(0.0);
        let top = (self.viewport.top + distance_y / self.scale).min(overlap_y).max(0.0);

        self.viewport = Viewport::new(left, top, left + width, top + height);
    }

    /// The viewport shifted by the home-screen offset.
    ///
    /// Only shifts when parallax is on and this is not a preview session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn parallax_offset(&self, preview: bool) -> Viewport {
        if !self.parallax || preview || self.image_width == 0 {
            return self.viewport;
        }

        let width = self.viewport.width();
        let total_possible = (self.image_width as f32 - width).max(0.0);
        let left = (total_possible * self.screen_offset).floor();

        Viewport::new(left, self.viewport.top, left + width, self.viewport.bottom)
    }

    /// Whether `width x height` flips landscape/portrait relative to the viewport.
    #[must_use]
    pub fn orientation_changed(&self, width: u32, height: u32) -> bool {
        self.viewport.is_landscape() != (width > height)
    }

    /// Records new image dimensions and re-clamps the viewport.
    pub fn image_changed(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
        self.recompute_min_scale();
        self.pan(0.0, 0.0);
    }

    /// Records a new surface size. Resets the viewport if the orientation
    /// flipped or it has no area yet.
    pub fn surface_changed(&mut self, width: u32, height: u32) {
        let reset = self.orientation_changed(width, height) || self.viewport.is_empty();
        self.screen = ScreenDimensions::new(width, height);
        self.recompute_min_scale();
        if reset {
            self.pan(0.0, 0.0);
        }
    }

    /// Pushes configured values: rectangle, parallax flag and scale.
    pub fn apply_preferences(&mut self, viewport: Viewport, parallax: bool, scale: f32) {
        self.viewport = viewport;
        self.parallax = parallax;
        if scale.is_finite() && scale > 0.0 {
            self.restore_scale(scale);
        } else {
            self.pan(0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn controller(screen: (u32, u32), image: (u32, u32), scale: f32) -> ViewportController {
        let mut c = ViewportController::new(scale, true);
        c.image_changed(image.0, image.1);
        c.surface_changed(screen.0, screen.1);
        c
    }

    #[test]
    fn test_min_scale_covers_screen() {
        let c = controller((1080, 1920), (2000, 3000), 5.3);
        assert!((c.min_scale() - 0.64).abs() < EPS);
    }

    #[test]
    fn test_set_scale_clamps_to_min() {
        let mut c = controller((1080, 1920), (2000, 3000), 1.0);
        c.set_scale(0.1);
        assert!((c.scale() - 0.64).abs() < EPS);
    }

    #[test]
    fn test_set_scale_clamps_to_max() {
        let mut c = controller((1080, 1920), (2000, 3000), 5.0);
        c.set_scale(4.0);
        assert!((c.scale() - MAX_SCALE).abs() < EPS);
    }

    #[test]
    fn test_set_scale_ignores_bad_multipliers() {
        let mut c = controller((1080, 1920), (2000, 3000), 2.0);
        c.set_scale(f32::NAN);
        c.set_scale(0.0);
        c.set_scale(-3.0);
        assert!((c.scale() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_min_scale_above_max_wins() {
        let c = controller((1080, 1920), (10, 10), 5.0);
        assert!((c.min_scale() - 192.0).abs() < EPS);
        assert!((c.scale() - 192.0).abs() < EPS);
    }

    #[test]
    fn test_pan_clamps_to_overlap() {
        let mut c = controller((1000, 1000), (4000, 3000), 2.0);
        // width = height = 500, overlap = (3500, 2500)
        c.pan(100_000.0, 100_000.0);
        let vp = c.viewport();
        assert!((vp.left - 3500.0).abs() < EPS);
        assert!((vp.top - 2500.0).abs() < EPS);
        assert!((vp.width() - 500.0).abs() < EPS);
        assert!((vp.height() - 500.0).abs() < EPS);

        c.pan(-100_000.0, -100_000.0);
        let vp = c.viewport();
        assert_eq!((vp.left, vp.top), (0.0, 0.0));
    }

    #[test]
    fn test_pan_divides_distance_by_scale() {
        let mut c = controller((1000, 1000), (4000, 3000), 2.0);
        c.pan(200.0, 50.0);
        let vp = c.viewport();
        assert!((vp.left - 100.0).abs() < EPS);
        assert!((vp.top - 25.0).abs() < EPS);
    }

    #[test]
    fn test_pan_property_over_many_deltas() {
        let mut c = controller((1080, 1920), (2000, 3000), 1.3);
        let (w, h) = (1080.0 / c.scale(), 1920.0 / c.scale());
        let (ox, oy) = (2000.0 - w, 3000.0 - h);

        for i in -40..40 {
            #[allow(clippy::cast_precision_loss)]
            let d = (i * i * i) as f32;
            c.pan(d, -d * 0.7);
            let vp = c.viewport();
            assert!(vp.left >= 0.0 && vp.left <= ox + EPS);
            assert!(vp.top >= 0.0 && vp.top <= oy + EPS);
            assert!((vp.width() - w).abs() < EPS);
            assert!((vp.height() - h).abs() < EPS);
        }
    }

    #[test]
    fn test_geometry_deferred_without_image() {
        let mut c = ViewportController::new(2.0, true);
        c.surface_changed(1080, 1920);
        c.pan(10.0, 10.0);
        assert_eq!(c.viewport(), Viewport::default());
        assert!(c.min_scale().abs() < EPS);
    }

    #[test]
    fn test_orientation_change_resets_viewport() {
        let mut c = controller((1920, 1080), (4000, 4000), 1.0);
        c.set_viewport(Viewport::new(0.0, 0.0, 1920.0, 1080.0));
        assert!(c.orientation_changed(1080, 1920));

        c.surface_changed(1080, 1920);
        let vp = c.viewport();
        assert!((vp.width() - 1080.0).abs() < EPS);
        assert!((vp.height() - 1920.0).abs() < EPS);
    }

    #[test]
    fn test_same_orientation_keeps_viewport() {
        let mut c = controller((1080, 1920), (4000, 4000), 1.0);
        let before = c.viewport();
        assert!(!c.orientation_changed(1080, 2000));
        c.surface_changed(1080, 2000);
        assert_eq!(c.viewport(), before);
    }

    #[test]
    fn test_parallax_offset_shifts_left() {
        let mut c = controller((1000, 1000), (3000, 1000), 1.0);
        c.set_screen_offset(0.5);
        let shifted = c.parallax_offset(false);
        // (3000 - 1000) * 0.5
        assert!((shifted.left - 1000.0).abs() < EPS);
        assert!((shifted.width() - 1000.0).abs() < EPS);
        assert_eq!(shifted.top, c.viewport().top);
    }

    #[test]
    fn test_parallax_offset_floors() {
        let mut c = controller((1000, 1000), (3001, 1000), 1.0);
        c.set_screen_offset(0.5);
        assert!((c.parallax_offset(false).left - 1000.0).abs() < EPS);
    }

    #[test]
    fn test_parallax_disabled_in_preview_or_when_off() {
        let mut c = controller((1000, 1000), (3000, 1000), 1.0);
        c.set_screen_offset(1.0);
        assert_eq!(c.parallax_offset(true), c.viewport());

        c.set_parallax(false);
        assert_eq!(c.parallax_offset(false), c.viewport());
    }

    #[test]
    fn test_screen_offset_is_clamped() {
        let mut c = ViewportController::new(1.0, true);
        c.set_screen_offset(3.0);
        assert!((c.screen_offset() - 1.0).abs() < EPS);
        c.set_screen_offset(f32::NAN);
        assert!((c.screen_offset() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_apply_preferences_reclamps() {
        let mut c = controller((1000, 1000), (4000, 3000), 2.0);
        c.apply_preferences(Viewport::new(9000.0, -5.0, 9100.0, 95.0), false, 4.0);
        let vp = c.viewport();
        assert!(!c.parallax());
        assert!((c.scale() - 4.0).abs() < EPS);
        assert!((vp.left - 3750.0).abs() < EPS);
        assert_eq!(vp.top, 0.0);
        assert!((vp.width() - 250.0).abs() < EPS);
    }

    #[test]
    fn test_viewport_to_ints_rounds() {
        assert_eq!(Viewport::new(0.4, 1.6, 10.5, 20.49).to_ints(), [0, 2, 11, 20]);
    }
}
