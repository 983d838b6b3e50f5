//! Image selection.
//!
//! Maps the active mode and its selector to a catalog image, and swaps the
//! current renderable once that image is available locally.

use super::catalog::ImageCatalog;
use super::image::{ImageInfo, RenderableImage, TimelineImage};
use super::time_override::TimeOverrideController;
use crate::config::{ImageMode, WallpaperSettings};

/// Outcome of [`ImageSelector::apply_resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The image was loaded and is now current.
    Apply,
    /// The image is downloading; it is applied when the catalog reports it ready.
    DownloadThenWait,
    /// Nothing changed.
    NoOp,
}

#[derive(Debug, Clone)]
pub struct ImageSelector {
    current: ImageInfo,
    renderable: RenderableImage,
    pending: Option<ImageInfo>,
}

impl Default for ImageSelector {
    fn default() -> Self {
        Self {
            current: ImageInfo::default_image(),
            renderable: RenderableImage::placeholder(),
            pending: None,
        }
    }
}

impl ImageSelector {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn current(&self) -> &ImageInfo { &self.current }

    #[must_use]
    pub const fn renderable(&self) -> &RenderableImage { &self.renderable }

    /// The current image, if it is a timeline image.
    pub const fn timeline_mut(&mut self) -> Option<&mut TimelineImage> {
        self.renderable.as_timeline_mut()
    }

    /// Image waiting for a download to finish.
    #[must_use]
    pub const fn pending(&self) -> Option<&ImageInfo> { self.pending.as_ref() }

    /// Looks up the image for `mode` using that mode's selector.
    ///
    /// A blank selector resolves to nothing. An unknown name is logged and
    /// resolves to nothing, so the current image stays on screen.
    #[must_use]
    pub fn resolve(
        mode: ImageMode,
        settings: &WallpaperSettings,
        catalog: &dyn ImageCatalog,
    ) -> Option<ImageInfo> {
        let selector = settings.selector_for(mode).trim();
        if selector.is_empty() {
            return None;
        }

        let image = match mode {
            ImageMode::Timeline => catalog.image_info_for_timeline(selector),
            ImageMode::Collection => catalog.image_info_for_collection(selector),
            ImageMode::Single => catalog.image_info_for_image(selector),
        };

        if image.is_none() {
            tracing::warn!(mode = %mode, selector, "selector not found in catalog");
        }
        image
    }

    /// Resolves the startup image: the active mode first, then every mode in
    /// Timeline, Collection, Single order.
    #[must_use]
    pub fn resolve_initial(
        settings: &WallpaperSettings,
        catalog: &dyn ImageCatalog,
    ) -> Option<ImageInfo> {
        std::iter::once(settings.image_mode)
            .chain([ImageMode::Timeline, ImageMode::Collection, ImageMode::Single])
            .find_map(|mode| Self::resolve(mode, settings, catalog))
    }

    /// Makes `image` current, downloading it first if needed.
    pub fn apply_resolved(
        &mut self,
        image: ImageInfo,
        catalog: &dyn ImageCatalog,
        time_override: &TimeOverrideController,
    ) -> Decision {
        if image == self.current {
            // A later request for the current image supersedes any pending download
            self.pending = None;
            return Decision::NoOp;
        }

        if !catalog.image_is_ready(&image) {
            // The catalog drops duplicates of a download still in flight
            tracing::debug!(image = %image, "image not ready, downloading");
            catalog.download_image(&image);
            self.pending = Some(image);
            return Decision::DownloadThenWait;
        }

        self.pending = None;
        let loaded = if image.is_timeline {
            catalog.load_timeline_image(&image).map(|mut timeline| {
                time_override.reassert(&mut timeline);
                RenderableImage::Timeline(timeline)
            })
        } else {
            catalog.load_image(&image).map(RenderableImage::Static)
        };

        match loaded {
            Ok(renderable) => {
                tracing::info!(
                    image = %image,
                    width = renderable.width(),
                    height = renderable.height(),
                    "image applied"
                );
                self.current = image;
                self.renderable = renderable;
                Decision::Apply
            }
            Err(err) => {
                tracing::warn!(image = %image, error = %err, "failed to load image");
                Decision::NoOp
            }
        }
    }

    /// Handles a finished download.
    ///
    /// The ready image is applied unless a different image is pending or
    /// already current. In that case the active mode is resolved again, so a
    /// later request wins over an earlier download.
    pub fn complete_download(
        &mut self,
        image: &ImageInfo,
        settings: &WallpaperSettings,
        catalog: &dyn ImageCatalog,
        time_override: &TimeOverrideController,
    ) -> Decision {
        let superseded = match &self.pending {
            Some(pending) => pending != image,
            None => !self.current.is_default() && self.current != *image,
        };
        if !superseded {
            return self.apply_resolved(image.clone(), catalog, time_override);
        }

        tracing::debug!(image = %image, "download superseded, resolving active mode");
        match Self::resolve(settings.image_mode, settings, catalog) {
            Some(active) => self.apply_resolved(active, catalog, time_override),
            None => Decision::NoOp,
        }
    }
}
