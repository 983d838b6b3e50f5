//! Registry of callbacks keyed by a numeric handle.
//!
//! Used by the configuration stores and the image catalogs. Callbacks run
//! outside the registry lock so a listener may register or remove listeners.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Shared callback receiving an event by reference.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct ListenerSet<E> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<E> std::fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.len()).finish()
    }
}

impl<E> ListenerSet<E> {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn add(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.lock().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Calls every registered listener with `event`.
    pub fn notify(&self, event: &E) {
        let listeners: Vec<Listener<E>> =
            self.entries.lock().iter().map(|(_, l)| Arc::clone(l)).collect();

        for listener in listeners {
            listener(event);
        }
    }
}
