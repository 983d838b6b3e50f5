//! Messages accepted by the engine actor.

use tokio::sync::oneshot;

use crate::config::{ConfigChange, WallpaperSettings};
use crate::wallpaper::engine::{EngineEvent, EngineState, Frame};
use crate::wallpaper::image::ImageInfo;

/// Messages that can be sent to the engine actor.
#[derive(Debug)]
pub enum EngineMessage {
    // ========================================================================
    // Surface lifecycle
    // ========================================================================
    SurfaceCreated,
    SurfaceChanged { width: u32, height: u32 },
    SurfaceDestroyed,
    VisibilityChanged { visible: bool },
    /// Home-screen paging position in `0..=1`.
    OffsetsChanged { offset: f32 },

    // ========================================================================
    // Gestures
    // ========================================================================
    ScaleGesture { multiplier: f32 },
    PanGesture { distance_x: f32, distance_y: f32 },

    // ========================================================================
    // Collaborator callbacks
    // ========================================================================
    HourTick,
    ConfigChanged(ConfigChange),
    ImageReady(ImageInfo),

    // ========================================================================
    // Control
    // ========================================================================
    Query {
        query: EngineQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },
    /// Tears the engine down and stops the actor.
    Destroy,
}

impl From<EngineEvent> for EngineMessage {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::ConfigChanged(change) => Self::ConfigChanged(change),
            EngineEvent::ImageReady(image) => Self::ImageReady(image),
        }
    }
}

impl EngineMessage {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SurfaceCreated => "SurfaceCreated",
            Self::SurfaceChanged { .. } => "SurfaceChanged",
            Self::SurfaceDestroyed => "SurfaceDestroyed",
            Self::VisibilityChanged { .. } => "VisibilityChanged",
            Self::OffsetsChanged { .. } => "OffsetsChanged",
            Self::ScaleGesture { .. } => "ScaleGesture",
            Self::PanGesture { .. } => "PanGesture",
            Self::HourTick => "HourTick",
            Self::ConfigChanged(_) => "ConfigChanged",
            Self::ImageReady(_) => "ImageReady",
            Self::Query { .. } => "Query",
            Self::Destroy => "Destroy",
        }
    }
}

/// Read-only questions answered by the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineQuery {
    State,
    Frame,
    CurrentImage,
    PendingImage,
    Settings,
    Scale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    State(EngineState),
    Frame(Frame),
    Image(Option<ImageInfo>),
    Settings(Box<WallpaperSettings>),
    Scale(f32),
}
