//! Configuration stores.
//!
//! The engine reads and writes configuration through [`ConfigStore`]. Two
//! implementations are provided: [`MemoryStore`] for embedding hosts and tests,
//! and [`FileStore`] backed by a JSONC file that is reloaded when edited.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::preferences::Preferences;
use super::types::{ConfigError, load_preferences_from_path};
use crate::listeners::{Listener, ListenerId, ListenerSet};

/// Notification sent to subscribers after the store changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange {
    /// Full store contents after the change.
    pub snapshot: Preferences,
    /// Keys whose value changed, sorted.
    pub changed_keys: Vec<String>,
}

/// Callback invoked with every [`ConfigChange`].
pub type ConfigListener = Listener<ConfigChange>;

/// Key/value configuration store with change notification.
pub trait ConfigStore: Send + Sync {
    /// Current contents of the store.
    fn snapshot(&self) -> Preferences;

    /// Writes `updates` into the store and notifies listeners about keys that
    /// actually changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn persist(&self, updates: Preferences) -> Result<(), ConfigError>;

    fn add_listener(&self, listener: ConfigListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Registers `listener` and returns a guard that removes it when dropped.
pub fn subscribe(store: &Arc<dyn ConfigStore>, listener: ConfigListener) -> Subscription {
    let id = store.add_listener(listener);
    Subscription { store: Arc::downgrade(store), id }
}

/// Listener registration on a [`ConfigStore`]. Unsubscribes on drop.
pub struct Subscription {
    store: Weak<dyn ConfigStore>,
    id: ListenerId,
}

impl Subscription {
    #[must_use]
    pub const fn id(&self) -> ListenerId { self.id }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.remove_listener(self.id);
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: RwLock<Preferences>,
    listeners: ListenerSet<ConfigChange>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(initial: Preferences) -> Self {
        Self {
            prefs: RwLock::new(initial),
            listeners: ListenerSet::new(),
        }
    }

    /// Replaces the whole contents, as an external editor would, and notifies
    /// listeners about every key that differs.
    pub fn replace(&self, prefs: Preferences) {
        let changed_keys = {
            let mut current = self.prefs.write();
            let changed = prefs.changed_keys(&current);
            *current = prefs.clone();
            changed
        };

        if !changed_keys.is_empty() {
            self.listeners.notify(&ConfigChange { snapshot: prefs, changed_keys });
        }
    }
}

impl ConfigStore for MemoryStore {
    fn snapshot(&self) -> Preferences { self.prefs.read().clone() }

    fn persist(&self, updates: Preferences) -> Result<(), ConfigError> {
        let (snapshot, changed_keys) = {
            let mut current = self.prefs.write();
            let changed = current.merge(&updates);
            (current.clone(), changed)
        };

        if !changed_keys.is_empty() {
            self.listeners.notify(&ConfigChange { snapshot, changed_keys });
        }
        Ok(())
    }

    fn add_listener(&self, listener: ConfigListener) -> ListenerId { self.listeners.add(listener) }

    fn remove_listener(&self, id: ListenerId) { self.listeners.remove(id); }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Store persisted to a JSON file.
///
/// The file is read with comment stripping and written back as pretty JSON.
/// Edits made outside the process are picked up by [`FileStore::reload`],
/// which [`super::watcher::watch_config_file`] calls on change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    prefs: RwLock<Preferences>,
    listeners: ListenerSet<ConfigChange>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let prefs = match load_preferences_from_path(&path) {
            Ok(prefs) => prefs,
            Err(ConfigError::NotFound) => Preferences::new(),
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            prefs: RwLock::new(prefs),
            listeners: ListenerSet::new(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Re-reads the file and notifies listeners about changed keys.
    ///
    /// Returns the changed keys. A file that disappeared or no longer parses
    /// leaves the current contents in place.
    pub fn reload(&self) -> Vec<String> {
        let loaded = match load_preferences_from_path(&self.path) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "config reload skipped");
                return Vec::new();
            }
        };

        let changed_keys = {
            let mut current = self.prefs.write();
            let changed = loaded.changed_keys(&current);
            if !changed.is_empty() {
                *current = loaded.clone();
            }
            changed
        };

        if !changed_keys.is_empty() {
            tracing::debug!(keys = ?changed_keys, "config file changed");
            self.listeners.notify(&ConfigChange {
                snapshot: loaded,
                changed_keys: changed_keys.clone(),
            });
        }
        changed_keys
    }

    fn write_file(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut contents = serde_json::to_string_pretty(prefs)?;
        contents.push('\n');
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn snapshot(&self) -> Preferences { self.prefs.read().clone() }

    fn persist(&self, updates: Preferences) -> Result<(), ConfigError> {
        let (snapshot, changed_keys) = {
            let mut current = self.prefs.write();
            let mut next = current.clone();
            let changed = next.merge(&updates);
            if changed.is_empty() {
                return Ok(());
            }
            self.write_file(&next)?;
            *current = next.clone();
            (next, changed)
        };

        self.listeners.notify(&ConfigChange { snapshot, changed_keys });
        Ok(())
    }

    fn add_listener(&self, listener: ConfigListener) -> ListenerId { self.listeners.add(listener) }

    fn remove_listener(&self, id: ListenerId) { self.listeners.remove(id); }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    fn recorder(store: &Arc<dyn ConfigStore>) -> (Subscription, Arc<Mutex<Vec<ConfigChange>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sub = subscribe(
            store,
            Arc::new(move |change: &ConfigChange| seen_clone.lock().push(change.clone())),
        );
        (sub, seen)
    }

    #[test]
    fn test_memory_store_persist_notifies_changed_keys() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new(Preferences::from_value(
            json!({ "scaleFactor": 2.0 }),
        )));
        let (_sub, seen) = recorder(&store);

        store
            .persist(Preferences::from_value(json!({ "scaleFactor": 2.0, "viewportLeft": 4 })))
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].changed_keys, vec!["viewportLeft"]);
        assert!(seen[0].changed_keys.iter().any(|key| key == "viewportLeft"));
        assert_eq!(seen[0].snapshot.opt_i32("viewportLeft"), Some(4));
    }

    #[test]
    fn test_memory_store_persist_without_change_is_silent() {
        let store: Arc<dyn ConfigStore> =
            Arc::new(MemoryStore::new(Preferences::from_value(json!({ "a": 1 }))));
        let (_sub, seen) = recorder(&store);

        store.persist(Preferences::from_value(json!({ "a": 1 }))).unwrap();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_memory_store_replace_reports_removed_keys() {
        let memory = Arc::new(MemoryStore::new(Preferences::from_value(json!({ "a": 1, "b": 2 }))));
        let store: Arc<dyn ConfigStore> = memory.clone();
        let (_sub, seen) = recorder(&store);

        memory.replace(Preferences::from_value(json!({ "a": 1 })));
        assert_eq!(seen.lock()[0].changed_keys, vec!["b"]);
        assert!(store.snapshot().get("b").is_none());
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::default());
        let (sub, seen) = recorder(&store);
        drop(sub);

        store.persist(Preferences::from_value(json!({ "a": 1 }))).unwrap();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("config.jsonc")).unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_file_store_persist_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileStore::open(&path).unwrap();

        store.persist(Preferences::from_value(json!({ "imageMode": "Single" }))).unwrap();

        let reloaded = load_preferences_from_path(&path).unwrap();
        assert_eq!(reloaded.get_str("imageMode"), Some("Single"));
    }

    #[test]
    fn test_file_store_reload_detects_external_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, "{ \"imageMode\": \"Timeline\" }").unwrap();

        let file_store = Arc::new(FileStore::open(&path).unwrap());
        let store: Arc<dyn ConfigStore> = file_store.clone();
        let (_sub, seen) = recorder(&store);

        fs::write(&path, "// edited\n{ \"imageMode\": \"Collection\" }").unwrap();
        assert_eq!(file_store.reload(), vec!["imageMode"]);
        assert_eq!(seen.lock().len(), 1);

        // Unchanged file does not notify again
        assert!(file_store.reload().is_empty());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_file_store_reload_keeps_contents_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"a\": 1 }").unwrap();
        let store = FileStore::open(&path).unwrap();

        fs::write(&path, "{ broken").unwrap();
        assert!(store.reload().is_empty());
        assert_eq!(store.snapshot().int("a", 0), 1);
    }
}
