//! Catalog described by a JSON manifest.
//!
//! ```jsonc
//! {
//!   "timelines": [{ "name": "V26", "id": 26, "width": 640, "height": 480, "source": "v26.lbm" }],
//!   "images": [{ "name": "CORAL", "id": 7, "width": 640, "height": 480, "bundled": true }],
//!   "collections": [{ "name": "Seascape", "images": ["CORAL"] }]
//! }
//! ```
//!
//! Relative `source` paths resolve against the manifest's directory. An image is
//! ready when it is bundled or has been copied into the cache directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{CatalogError, ImageCatalog, LoadListener, collection_member};
use crate::listeners::{ListenerId, ListenerSet};
use crate::platform::Clock;
use crate::platform::path::expand_and_resolve;
use crate::platform::thread::spawn_named_thread;
use crate::wallpaper::image::{ImageInfo, StaticImage, TimelineImage};

/// One timeline or image in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    pub id: u64,
    pub width: u32,
    pub height: u32,

    /// File the image is downloaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Shipped with the application and always ready.
    #[serde(default)]
    pub bundled: bool,
}

/// Named set of images rotating every hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManifestCollection {
    pub name: String,

    /// Image names, in rotation order.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    #[serde(default)]
    pub timelines: Vec<ManifestEntry>,
    #[serde(default)]
    pub images: Vec<ManifestEntry>,
    #[serde(default)]
    pub collections: Vec<ManifestCollection>,
}

impl Manifest {
    /// Parses a JSONC manifest.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Manifest` if the text is not a valid manifest.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let stripped = json_comments::StripComments::new(text.as_bytes());
        Ok(serde_json::from_reader(stripped)?)
    }
}

pub struct ManifestCatalog {
    manifest: Manifest,
    base_dir: PathBuf,
    cache_dir: PathBuf,
    clock: Arc<dyn Clock>,
    in_flight: Arc<Mutex<HashSet<u64>>>,
    listeners: Arc<ListenerSet<ImageInfo>>,
}

impl std::fmt::Debug for ManifestCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestCatalog")
            .field("base_dir", &self.base_dir)
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}

impl ManifestCatalog {
    /// Reads the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: &Path, cache_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        let manifest = Manifest::parse(&text)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        tracing::debug!(
            path = %path.display(),
            timelines = manifest.timelines.len(),
            images = manifest.images.len(),
            collections = manifest.collections.len(),
            "loaded catalog manifest"
        );

        Ok(Self::new(manifest, base_dir, cache_dir, clock))
    }

    #[must_use]
    pub fn new(
        manifest: Manifest,
        base_dir: PathBuf,
        cache_dir: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            manifest,
            base_dir,
            cache_dir,
            clock,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            listeners: Arc::new(ListenerSet::new()),
        }
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest { &self.manifest }

    /// Whether the entry is bundled or already cached.
    #[must_use]
    pub fn entry_is_ready(&self, entry: &ManifestEntry) -> bool {
        entry.bundled || self.cached_path(entry).is_file()
    }

    /// Location of the cached copy of `entry`.
    #[must_use]
    pub fn cached_path(&self, entry: &ManifestEntry) -> PathBuf {
        let extension = entry
            .source
            .as_deref()
            .and_then(|source| Path::new(source).extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        self.cache_dir.join(format!("{}-{}{extension}", entry.id, entry.name))
    }

    fn find_entry(&self, image: &ImageInfo) -> Option<&ManifestEntry> {
        let entries = if image.is_timeline { &self.manifest.timelines } else { &self.manifest.images };
        entries.iter().find(|entry| entry.id == image.id && entry.name == image.name)
    }

    fn ready_entry(&self, image: &ImageInfo) -> Result<&ManifestEntry, CatalogError> {
        let entry =
            self.find_entry(image).ok_or_else(|| CatalogError::UnknownImage(image.name.clone()))?;
        if !self.entry_is_ready(entry) {
            return Err(CatalogError::NotReady(image.name.clone()));
        }
        Ok(entry)
    }
}

fn info_for(entries: &[ManifestEntry], name: &str, is_timeline: bool) -> Option<ImageInfo> {
    entries
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| ImageInfo::new(entry.name.clone(), entry.id, is_timeline))
}

fn copy_into_cache(source: &Path, target: &Path) -> Result<(), CatalogError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    // A partially copied file must never look ready
    let partial = target.with_extension("part");
    fs::copy(source, &partial)?;
    fs::rename(&partial, target)?;
    Ok(())
}

impl ImageCatalog for ManifestCatalog {
    fn image_info_for_timeline(&self, name: &str) -> Option<ImageInfo> {
        info_for(&self.manifest.timelines, name, true)
    }

    fn image_info_for_collection(&self, name: &str) -> Option<ImageInfo> {
        let collection = self.manifest.collections.iter().find(|c| c.name == name)?;
        let member = collection_member(&collection.images, self.clock.hour())?;
        self.image_info_for_image(member)
    }

    fn image_info_for_image(&self, name: &str) -> Option<ImageInfo> {
        info_for(&self.manifest.images, name, false)
    }

    fn image_is_ready(&self, image: &ImageInfo) -> bool {
        self.find_entry(image).is_some_and(|entry| self.entry_is_ready(entry))
    }

    fn download_image(&self, image: &ImageInfo) {
        let Some(entry) = self.find_entry(image) else {
            tracing::warn!(image = %image, "download requested for unknown image");
            return;
        };
        let Some(source) = entry.source.as_deref() else {
            tracing::warn!(image = %image, error = %CatalogError::NoSource(image.name.clone()), "cannot download image");
            return;
        };

        if !self.in_flight.lock().insert(image.id) {
            tracing::debug!(image = %image, "download already in progress");
            return;
        }

        let source = expand_and_resolve(source, &self.base_dir);
        let target = self.cached_path(entry);
        let image = image.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let listeners = Arc::clone(&self.listeners);

        tracing::info!(image = %image, source = %source.display(), "downloading image");
        spawn_named_thread("catalog-download", move || {
            let result = copy_into_cache(&source, &target);
            in_flight.lock().remove(&image.id);

            match result {
                Ok(()) => {
                    tracing::debug!(image = %image, path = %target.display(), "image cached");
                    listeners.notify(&image);
                }
                Err(err) => {
                    tracing::warn!(image = %image, error = %err, "image download failed");
                }
            }
        });
    }

    fn load_image(&self, image: &ImageInfo) -> Result<StaticImage, CatalogError> {
        let entry = self.ready_entry(image)?;
        Ok(StaticImage::new(image.clone(), entry.width, entry.height))
    }

    fn load_timeline_image(&self, image: &ImageInfo) -> Result<TimelineImage, CatalogError> {
        let entry = self.ready_entry(image)?;
        Ok(TimelineImage::new(image.clone(), entry.width, entry.height))
    }

    fn add_load_listener(&self, listener: LoadListener) -> ListenerId { self.listeners.add(listener) }

    fn remove_load_listener(&self, id: ListenerId) { self.listeners.remove(id); }
}
