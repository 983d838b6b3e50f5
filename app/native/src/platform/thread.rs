//! Named worker threads.
//!
//! File watching and catalog downloads run outside the engine actor. Naming
//! the threads keeps them identifiable in traces and debuggers.

use std::thread;

use crate::constants::APP_ID;

/// Spawns a detached thread named `pixellwp-{name}`.
///
/// Spawn failures are logged rather than propagated; callers treat the work
/// as best-effort.
pub fn spawn_named_thread<F>(name: &str, task: F)
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{APP_ID}-{name}");

    if let Err(err) = thread::Builder::new().name(thread_name.clone()).spawn(task) {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
    }
}
