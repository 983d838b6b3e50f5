//! Image identity and loaded renderables.

use serde::{Deserialize, Serialize};

use crate::constants::DAY_MILLIS;
use crate::platform::Clock;

/// Identity of a catalog image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,
    pub id: u64,
    pub is_timeline: bool,
}

impl ImageInfo {
    pub const DEFAULT_NAME: &'static str = "DefaultImage";

    #[must_use]
    pub fn new(name: impl Into<String>, id: u64, is_timeline: bool) -> Self {
        Self { name: name.into(), id, is_timeline }
    }

    /// Placeholder shown before any image resolved.
    #[must_use]
    pub fn default_image() -> Self { Self::new(Self::DEFAULT_NAME, 0, false) }

    #[must_use]
    pub fn is_default(&self) -> bool { *self == Self::default_image() }
}

impl std::fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// A loaded image whose content does not depend on time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticImage {
    pub info: ImageInfo,
    pub width: u32,
    pub height: u32,
}

impl StaticImage {
    #[must_use]
    pub const fn new(info: ImageInfo, width: u32, height: u32) -> Self { Self { info, width, height } }

    /// Zero-sized stand-in for [`ImageInfo::default_image`].
    #[must_use]
    pub fn placeholder() -> Self { Self::new(ImageInfo::default_image(), 0, 0) }
}

/// A loaded image whose content follows the time of day.
///
/// While an override is active the image renders at the overridden time
/// instead of the wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineImage {
    pub info: ImageInfo,
    pub width: u32,
    pub height: u32,
    override_time: i64,
    overriding: bool,
}

impl TimelineImage {
    #[must_use]
    pub const fn new(info: ImageInfo, width: u32, height: u32) -> Self {
        Self { info, width, height, override_time: 0, overriding: false }
    }

    /// Overridden time in milliseconds since midnight, if overriding.
    #[must_use]
    pub const fn override_time(&self) -> Option<i64> {
        if self.overriding { Some(self.override_time) } else { None }
    }

    #[must_use]
    pub const fn is_overriding(&self) -> bool { self.overriding }

    pub const fn set_time_override(&mut self, millis: i64) {
        self.override_time = millis.rem_euclid(DAY_MILLIS);
        self.overriding = true;
    }

    /// Returns to wall-clock time.
    pub const fn stop_time_override(&mut self) { self.overriding = false; }

    /// Time of day the image renders at, in milliseconds since midnight.
    #[must_use]
    pub fn time_of_day(&self, clock: &dyn Clock) -> i64 {
        self.override_time().unwrap_or_else(|| clock.millis_since_midnight())
    }
}

/// Image currently held by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableImage {
    Static(StaticImage),
    Timeline(TimelineImage),
}

impl RenderableImage {
    #[must_use]
    pub fn placeholder() -> Self { Self::Static(StaticImage::placeholder()) }

    #[must_use]
    pub const fn info(&self) -> &ImageInfo {
        match self {
            Self::Static(image) => &image.info,
            Self::Timeline(image) => &image.info,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Self::Static(image) => image.width,
            Self::Timeline(image) => image.width,
        }
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::Static(image) => image.height,
            Self::Timeline(image) => image.height,
        }
    }

    #[must_use]
    pub const fn as_timeline(&self) -> Option<&TimelineImage> {
        match self {
            Self::Timeline(image) => Some(image),
            Self::Static(_) => None,
        }
    }

    pub const fn as_timeline_mut(&mut self) -> Option<&mut TimelineImage> {
        match self {
            Self::Timeline(image) => Some(image),
            Self::Static(_) => None,
        }
    }
}

impl From<StaticImage> for RenderableImage {
    fn from(image: StaticImage) -> Self { Self::Static(image) }
}

impl From<TimelineImage> for RenderableImage {
    fn from(image: TimelineImage) -> Self { Self::Timeline(image) }
}
