//! In-process image catalog.
//!
//! Images are registered up front with their dimensions. Downloads are only
//! recorded; the host (or a test) completes them with
//! [`MemoryCatalog::finish_download`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{CatalogError, ImageCatalog, LoadListener, collection_member};
use crate::listeners::{ListenerId, ListenerSet};
use crate::platform::{Clock, SystemClock};
use crate::wallpaper::image::{ImageInfo, StaticImage, TimelineImage};

#[derive(Debug, Clone)]
struct Entry {
    info: ImageInfo,
    width: u32,
    height: u32,
}

pub struct MemoryCatalog {
    clock: Arc<dyn Clock>,
    timelines: HashMap<String, u64>,
    images: HashMap<String, u64>,
    collections: HashMap<String, Vec<String>>,
    entries: HashMap<u64, Entry>,
    ready: Mutex<HashSet<u64>>,
    failing: Mutex<HashSet<u64>>,
    downloads: Mutex<Vec<ImageInfo>>,
    loads: AtomicUsize,
    listeners: ListenerSet<ImageInfo>,
}

impl Default for MemoryCatalog {
    fn default() -> Self { Self::new(Arc::new(SystemClock)) }
}

impl std::fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("timelines", &self.timelines.len())
            .field("images", &self.images.len())
            .field("collections", &self.collections.len())
            .finish_non_exhaustive()
    }
}

impl MemoryCatalog {
    /// Creates an empty catalog. `clock` drives collection rotation.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timelines: HashMap::new(),
            images: HashMap::new(),
            collections: HashMap::new(),
            entries: HashMap::new(),
            ready: Mutex::new(HashSet::new()),
            failing: Mutex::new(HashSet::new()),
            downloads: Mutex::new(Vec::new()),
            loads: AtomicUsize::new(0),
            listeners: ListenerSet::new(),
        }
    }

    /// Registers a ready timeline image.
    #[must_use]
    pub fn with_timeline(mut self, name: &str, id: u64, width: u32, height: u32) -> Self {
        self.insert(ImageInfo::new(name, id, true), width, height);
        self.timelines.insert(name.to_string(), id);
        self
    }

    /// Registers a ready static image.
    #[must_use]
    pub fn with_image(mut self, name: &str, id: u64, width: u32, height: u32) -> Self {
        self.insert(ImageInfo::new(name, id, false), width, height);
        self.images.insert(name.to_string(), id);
        self
    }

    /// Registers a collection of previously registered image names.
    #[must_use]
    pub fn with_collection(mut self, name: &str, members: &[&str]) -> Self {
        self.collections
            .insert(name.to_string(), members.iter().map(ToString::to_string).collect());
        self
    }

    /// Marks a registered image or timeline as not downloaded yet.
    #[must_use]
    pub fn with_pending(self, name: &str) -> Self {
        if let Some(id) = self.id_for(name) {
            self.ready.lock().remove(&id);
        }
        self
    }

    fn insert(&mut self, info: ImageInfo, width: u32, height: u32) {
        self.ready.get_mut().insert(info.id);
        self.entries.insert(info.id, Entry { info, width, height });
    }

    fn id_for(&self, name: &str) -> Option<u64> {
        self.timelines.get(name).or_else(|| self.images.get(name)).copied()
    }

    fn entry(&self, image: &ImageInfo) -> Result<&Entry, CatalogError> {
        self.entries
            .get(&image.id)
            .filter(|entry| entry.info == *image)
            .ok_or_else(|| CatalogError::UnknownImage(image.name.clone()))
    }

    fn checked_entry(&self, image: &ImageInfo) -> Result<&Entry, CatalogError> {
        let entry = self.entry(image)?;
        if self.failing.lock().contains(&image.id) {
            return Err(CatalogError::Io(std::io::Error::other(format!(
                "corrupt image {}",
                image.name
            ))));
        }
        if !self.image_is_ready(image) {
            return Err(CatalogError::NotReady(image.name.clone()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(entry)
    }

    /// Marks the image downloaded and notifies load listeners.
    pub fn finish_download(&self, image: &ImageInfo) {
        self.ready.lock().insert(image.id);
        self.listeners.notify(image);
    }

    /// Makes every later load of `name` fail.
    pub fn fail_loads_for(&self, name: &str) {
        if let Some(id) = self.id_for(name) {
            self.failing.lock().insert(id);
        }
    }

    /// Download requests received so far.
    #[must_use]
    pub fn downloads(&self) -> Vec<ImageInfo> { self.downloads.lock().clone() }

    /// Number of successful loads so far.
    #[must_use]
    pub fn load_count(&self) -> usize { self.loads.load(Ordering::SeqCst) }

    /// Number of registered load listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize { self.listeners.len() }
}

impl ImageCatalog for MemoryCatalog {
    fn image_info_for_timeline(&self, name: &str) -> Option<ImageInfo> {
        let id = self.timelines.get(name)?;
        self.entries.get(id).map(|entry| entry.info.clone())
    }

    fn image_info_for_collection(&self, name: &str) -> Option<ImageInfo> {
        let members = self.collections.get(name)?;
        let member = collection_member(members, self.clock.hour())?;
        self.image_info_for_image(member)
    }

    fn image_info_for_image(&self, name: &str) -> Option<ImageInfo> {
        let id = self.images.get(name)?;
        self.entries.get(id).map(|entry| entry.info.clone())
    }

    fn image_is_ready(&self, image: &ImageInfo) -> bool { self.ready.lock().contains(&image.id) }

    fn download_image(&self, image: &ImageInfo) {
        tracing::debug!(image = %image, "download requested");
        self.downloads.lock().push(image.clone());
    }

    fn load_image(&self, image: &ImageInfo) -> Result<StaticImage, CatalogError> {
        let entry = self.checked_entry(image)?;
        Ok(StaticImage::new(entry.info.clone(), entry.width, entry.height))
    }

    fn load_timeline_image(&self, image: &ImageInfo) -> Result<TimelineImage, CatalogError> {
        let entry = self.checked_entry(image)?;
        Ok(TimelineImage::new(entry.info.clone(), entry.width, entry.height))
    }

    fn add_load_listener(&self, listener: LoadListener) -> ListenerId { self.listeners.add(listener) }

    fn remove_load_listener(&self, id: ListenerId) { self.listeners.remove(id); }
}
