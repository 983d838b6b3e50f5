//! Live wallpaper engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Host Event Sources                        │
//! │  (surface lifecycle, gestures, config store, catalog)       │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ mpsc::Sender<EngineMessage>
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Actor                             │
//! │  - Owns one Engine, processes messages sequentially         │
//! │  - Sends HourTick while active                              │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Engine                                │
//! │  PreferenceSyncBridge → ImageSelector → ImageCatalog        │
//! │  TimeOverrideController, ViewportController                 │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ SharedObservable<Frame> + draw_now
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Renderer                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod actor;
pub mod catalog;
pub mod engine;
pub mod image;
pub mod renderer;
pub mod selector;
pub mod sync;
pub mod time_override;
pub mod viewport;

pub use actor::{ActorError, EngineActor, EngineHandle, EngineMessage, EngineQuery, QueryResult};
pub use catalog::{CatalogError, ImageCatalog, ManifestCatalog, MemoryCatalog};
pub use engine::{Engine, EngineDeps, EngineEvent, EngineState, EventSink, Frame, SessionKind};
pub use image::{ImageInfo, RenderableImage, StaticImage, TimelineImage};
pub use renderer::{Renderer, TracingRenderer};
pub use selector::{Decision, ImageSelector};
pub use sync::PreferenceSyncBridge;
pub use time_override::TimeOverrideController;
pub use viewport::{MAX_SCALE, ScreenDimensions, Viewport, ViewportController};
