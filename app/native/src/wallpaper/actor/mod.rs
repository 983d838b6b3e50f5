//! Engine actor.
//!
//! The actor owns one [`Engine`] and processes messages sequentially, so the
//! engine itself needs no locking. Configuration and catalog callbacks arrive
//! on foreign threads and are forwarded through a separate unbounded channel,
//! so they are never lost while host messages fill the bounded one. Pending
//! callbacks are handled before the next host message.
//!
//! # Panic Recovery
//!
//! If a message handler panics, the panic is caught and logged and the actor
//! continues with the next message. Engine state may be partially updated.

mod handle;
mod messages;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

pub use handle::{ActorError, EngineHandle};
pub use messages::{EngineMessage, EngineQuery, QueryResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::engine::{Engine, EngineDeps, EngineEvent, EngineState, EventSink, SessionKind};
use crate::constants::HOUR_TICK_INTERVAL_SECS;

/// Channel buffer size for the engine actor.
const CHANNEL_BUFFER_SIZE: usize = 64;

pub struct EngineActor {
    engine: Engine,
    receiver: mpsc::Receiver<EngineMessage>,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    sender: mpsc::WeakSender<EngineMessage>,
    ticker: Option<JoinHandle<()>>,
    tick_interval: Duration,
}

impl EngineActor {
    /// Builds the engine and spawns its actor on the current tokio runtime.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(deps: EngineDeps, session: SessionKind) -> EngineHandle {
        Self::spawn_with_interval(deps, session, Duration::from_secs(HOUR_TICK_INTERVAL_SECS))
    }

    /// Like [`Self::spawn`] with a custom hourly-check interval.
    #[must_use]
    pub fn spawn_with_interval(
        deps: EngineDeps,
        session: SessionKind,
        tick_interval: Duration,
    ) -> EngineHandle {
        tracing::debug!(session = ?session, "spawning engine actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (event_sender, events) = mpsc::unbounded_channel();
        let weak = sender.downgrade();

        let engine = Engine::new(deps, session, event_sink(event_sender));
        let actor = Self {
            engine,
            receiver,
            events,
            sender: weak,
            ticker: None,
            tick_interval,
        };

        tokio::spawn(actor.run());

        EngineHandle::new(sender)
    }

    /// Runs the message loop until destroyed or every handle is dropped.
    async fn run(mut self) {
        tracing::trace!("engine actor loop starting");

        loop {
            let msg = tokio::select! {
                biased;
                Some(event) = self.events.recv() => EngineMessage::from(event),
                msg = self.receiver.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };

            if matches!(msg, EngineMessage::Destroy) {
                tracing::debug!("engine actor received destroy");
                self.engine.destroy();
                break;
            }

            let msg_name = msg.name();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.handle_message(msg);
            }));

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(message = msg_name, panic = %panic_msg, "engine actor recovered from panic");
            }
        }

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        tracing::debug!("engine actor stopped");
    }

    fn handle_message(&mut self, msg: EngineMessage) {
        match msg {
            EngineMessage::SurfaceCreated => {
                self.engine.on_surface_created();
                if self.engine.state() == EngineState::Active {
                    self.start_ticker();
                }
            }
            EngineMessage::SurfaceChanged { width, height } => {
                self.engine.on_surface_changed(width, height);
            }
            EngineMessage::SurfaceDestroyed => self.engine.on_surface_destroyed(),
            EngineMessage::VisibilityChanged { visible } => {
                self.engine.on_visibility_changed(visible);
            }
            EngineMessage::OffsetsChanged { offset } => self.engine.on_offsets_changed(offset),
            EngineMessage::ScaleGesture { multiplier } => self.engine.on_scale_gesture(multiplier),
            EngineMessage::PanGesture { distance_x, distance_y } => {
                self.engine.on_pan_gesture(distance_x, distance_y);
            }
            EngineMessage::HourTick => self.engine.on_hour_tick(),
            EngineMessage::ConfigChanged(change) => self.engine.on_config_changed(&change),
            EngineMessage::ImageReady(image) => self.engine.on_image_ready(&image),
            EngineMessage::Query { query, respond_to } => {
                let _ = respond_to.send(self.handle_query(query));
            }
            // Handled by the run loop
            EngineMessage::Destroy => {}
        }
    }

    fn handle_query(&self, query: EngineQuery) -> QueryResult {
        match query {
            EngineQuery::State => QueryResult::State(self.engine.state()),
            EngineQuery::Frame => QueryResult::Frame(self.engine.frame()),
            EngineQuery::CurrentImage => {
                QueryResult::Image(Some(self.engine.current_image().clone()))
            }
            EngineQuery::PendingImage => QueryResult::Image(self.engine.pending_image().cloned()),
            EngineQuery::Settings => QueryResult::Settings(Box::new(self.engine.settings().clone())),
            EngineQuery::Scale => QueryResult::Scale(self.engine.viewport_controller().scale()),
        }
    }

    /// Sends `HourTick` on every interval while the actor lives.
    fn start_ticker(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let weak = self.sender.clone();
        let period = self.tick_interval;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let Some(sender) = weak.upgrade() else {
                    break;
                };
                if sender.send(EngineMessage::HourTick).await.is_err() {
                    break;
                }
            }
        }));
    }
}

/// Forwards collaborator callbacks into the actor's event channel.
///
/// The actor stops when its host message channel closes, so this sender never
/// keeps it alive. Sending only fails once the actor is gone.
fn event_sink(sender: mpsc::UnboundedSender<EngineEvent>) -> EventSink {
    Arc::new(move |event: EngineEvent| {
        if sender.send(event).is_err() {
            tracing::trace!("engine actor gone, event discarded");
        }
    })
}
