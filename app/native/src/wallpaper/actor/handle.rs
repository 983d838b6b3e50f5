//! Handle for communicating with the engine actor.
//!
//! The `EngineHandle` is cheap to clone and can be shared across threads. The
//! actor stops once every handle is dropped or [`EngineHandle::destroy`] is sent.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::messages::{EngineMessage, EngineQuery, QueryResult};
use crate::config::WallpaperSettings;
use crate::wallpaper::engine::{EngineState, Frame};
use crate::wallpaper::image::ImageInfo;

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to engine: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from engine: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    /// The actor answered with a different result kind.
    #[error("Unexpected reply to {0:?}")]
    UnexpectedReply(EngineQuery),
}

#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineMessage>,
}

impl EngineHandle {
    pub(crate) const fn new(sender: mpsc::Sender<EngineMessage>) -> Self { Self { sender } }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Queues a message without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: EngineMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Queues a message, waiting for buffer space.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn send_async(&self, msg: EngineMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    /// Whether the actor has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.sender.is_closed() }

    // ========================================================================
    // Host events
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn surface_created(&self) -> Result<(), ActorError> {
        self.send_async(EngineMessage::SurfaceCreated).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn surface_changed(&self, width: u32, height: u32) -> Result<(), ActorError> {
        self.send_async(EngineMessage::SurfaceChanged { width, height }).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn surface_destroyed(&self) -> Result<(), ActorError> {
        self.send_async(EngineMessage::SurfaceDestroyed).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn visibility_changed(&self, visible: bool) -> Result<(), ActorError> {
        self.send_async(EngineMessage::VisibilityChanged { visible }).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn offsets_changed(&self, offset: f32) -> Result<(), ActorError> {
        self.send_async(EngineMessage::OffsetsChanged { offset }).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn scale_gesture(&self, multiplier: f32) -> Result<(), ActorError> {
        self.send_async(EngineMessage::ScaleGesture { multiplier }).await
    }

    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn pan_gesture(&self, distance_x: f32, distance_y: f32) -> Result<(), ActorError> {
        self.send_async(EngineMessage::PanGesture { distance_x, distance_y }).await
    }

    /// Tears the engine down and stops the actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has already stopped.
    pub async fn destroy(&self) -> Result<(), ActorError> {
        self.send_async(EngineMessage::Destroy).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Executes a query and waits for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the actor dropped the reply.
    pub async fn query(&self, query: EngineQuery) -> Result<QueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(EngineMessage::Query { query, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Executes a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: EngineQuery,
        timeout: Duration,
    ) -> Result<QueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn state(&self) -> Result<EngineState, ActorError> {
        match self.query(EngineQuery::State).await? {
            QueryResult::State(state) => Ok(state),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::State)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn frame(&self) -> Result<Frame, ActorError> {
        match self.query(EngineQuery::Frame).await? {
            QueryResult::Frame(frame) => Ok(frame),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::Frame)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn current_image(&self) -> Result<ImageInfo, ActorError> {
        match self.query(EngineQuery::CurrentImage).await? {
            QueryResult::Image(Some(image)) => Ok(image),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::CurrentImage)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn pending_image(&self) -> Result<Option<ImageInfo>, ActorError> {
        match self.query(EngineQuery::PendingImage).await? {
            QueryResult::Image(image) => Ok(image),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::PendingImage)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn settings(&self) -> Result<WallpaperSettings, ActorError> {
        match self.query(EngineQuery::Settings).await? {
            QueryResult::Settings(settings) => Ok(*settings),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::Settings)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn scale(&self) -> Result<f32, ActorError> {
        match self.query(EngineQuery::Scale).await? {
            QueryResult::Scale(scale) => Ok(scale),
            _ => Err(ActorError::UnexpectedReply(EngineQuery::Scale)),
        }
    }
}
