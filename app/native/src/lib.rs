//! pixellwp - A live wallpaper engine.
//!
//! The engine picks an image from a catalog according to the configured mode
//! (timeline, hourly collection or single image), keeps an optional fixed time
//! of day for timeline images and maintains a zoomable, parallax-shifted
//! viewport that is persisted back to the configuration.
//!
//! Hosts drive an engine through [`wallpaper::EngineHandle`]; the bundled CLI
//! runs a headless session with a logging renderer.

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod listeners;
pub mod platform;
pub mod schema;
pub mod wallpaper;
