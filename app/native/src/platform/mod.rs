//! Host platform helpers.
//!
//! - [`clock`] - Wall-clock access behind a trait so the engine can be driven by tests
//! - [`path`] - Tilde expansion and relative path resolution
//! - [`thread`] - Named worker threads

pub mod clock;
pub mod path;
pub mod thread;

pub use clock::{Clock, SystemClock};
