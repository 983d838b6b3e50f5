//! Error types for pixellwp.
//!
//! The engine core never fails: its "errors" are policy branches that keep the
//! current image on screen. This module collects the infrastructure errors
//! surfaced by the CLI and the host glue.

use thiserror::Error;

use crate::config::ConfigError;
use crate::wallpaper::{ActorError, CatalogError};

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum PixellError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Image catalog error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Engine actor communication error.
    #[error("Engine error: {0}")]
    Engine(#[from] ActorError),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<serde_json::Error> for PixellError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<String> for PixellError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for PixellError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
