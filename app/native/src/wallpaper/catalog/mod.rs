//! Image catalogs.
//!
//! A catalog maps symbolic selector names to images, tracks which images are
//! available locally, and loads them. Downloads complete asynchronously and are
//! announced to load listeners.
//!
//! - [`MemoryCatalog`] - In-process catalog for embedding hosts and tests
//! - [`ManifestCatalog`] - Catalog described by a JSON manifest, cached on disk

mod manifest;
mod memory;

pub use manifest::{Manifest, ManifestCatalog, ManifestCollection, ManifestEntry};
pub use memory::MemoryCatalog;
use thiserror::Error;

use super::image::{ImageInfo, StaticImage, TimelineImage};
use crate::listeners::{Listener, ListenerId};

/// Callback invoked when an image finished downloading.
pub type LoadListener = Listener<ImageInfo>;

/// Errors raised while loading catalog images.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The image is not part of the catalog.
    #[error("Unknown image: {0}")]
    UnknownImage(String),
    /// The image exists but is not available locally.
    #[error("Image is not downloaded: {0}")]
    NotReady(String),
    /// The image has no source to download from.
    #[error("Image has no source: {0}")]
    NoSource(String),
    /// The manifest could not be parsed.
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    /// Reading or writing image files failed.
    #[error("Failed to access image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of wallpaper images.
pub trait ImageCatalog: Send + Sync {
    /// Looks up a timeline image set by name.
    fn image_info_for_timeline(&self, name: &str) -> Option<ImageInfo>;

    /// Looks up the image a collection shows right now.
    fn image_info_for_collection(&self, name: &str) -> Option<ImageInfo>;

    /// Looks up a single image by name.
    fn image_info_for_image(&self, name: &str) -> Option<ImageInfo>;

    /// Whether the image can be loaded without downloading.
    fn image_is_ready(&self, image: &ImageInfo) -> bool;

    /// Starts downloading the image. Completion is announced to load listeners.
    fn download_image(&self, image: &ImageInfo);

    /// Loads a static image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is unknown or not available locally.
    fn load_image(&self, image: &ImageInfo) -> Result<StaticImage, CatalogError>;

    /// Loads a timeline image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is unknown or not available locally.
    fn load_timeline_image(&self, image: &ImageInfo) -> Result<TimelineImage, CatalogError>;

    fn add_load_listener(&self, listener: LoadListener) -> ListenerId;

    fn remove_load_listener(&self, id: ListenerId);
}

/// Picks the collection member for `hour`.
///
/// Collections rotate hourly, so member `hour % len` is shown.
#[must_use]
pub fn collection_member<T>(members: &[T], hour: u32) -> Option<&T> {
    if members.is_empty() {
        return None;
    }
    members.get(hour as usize % members.len())
}
