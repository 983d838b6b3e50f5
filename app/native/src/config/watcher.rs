//! Configuration file watcher for hot-reloading.
//!
//! Watches the directory containing the config file and calls
//! [`FileStore::reload`] once the file has been quiet for the debounce window.

use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::store::FileStore;
use crate::platform::thread::spawn_named_thread;

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// How often the watcher checks whether its store is still alive.
const LIVENESS_POLL_MS: u64 = 1000;

/// Starts watching the store's file on a background thread.
///
/// The thread exits once the last strong reference to `store` is dropped.
pub fn watch_config_file(store: &Arc<FileStore>) {
    let config_path = store.path().to_path_buf();
    let config_filename =
        config_path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    let weak_store = Arc::downgrade(store);

    spawn_named_thread("config-watcher", move || {
        let (tx, rx) = mpsc::channel();

        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(w) => w,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create config watcher");
                return;
            }
        };

        // Watch the parent directory to catch editors that save by rename
        let watch_path = config_path.parent().unwrap_or(&config_path);
        if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
            tracing::warn!(path = %watch_path.display(), error = %err, "failed to watch config file");
            return;
        }
        tracing::debug!(path = %config_path.display(), "watching config file");

        let debounce = Duration::from_millis(CONFIG_DEBOUNCE_MS);
        let poll = Duration::from_millis(LIVENESS_POLL_MS);
        let mut pending_since: Option<Instant> = None;

        loop {
            let timeout = pending_since
                .map_or(poll, |since| debounce.saturating_sub(since.elapsed()));

            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    let affects_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|name| name == config_filename));
                    if affects_config {
                        pending_since = Some(Instant::now());
                    }
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "config watch error");
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }

            let Some(store) = weak_store.upgrade() else {
                break;
            };

            if pending_since.is_some_and(|since| since.elapsed() >= debounce) {
                pending_since = None;
                store.reload();
            }
        }

        tracing::debug!("config watcher stopped");
    });
}
