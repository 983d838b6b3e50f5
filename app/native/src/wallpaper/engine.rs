//! The wallpaper engine state machine.
//!
//! One [`Engine`] backs one wallpaper surface. It owns the selector, the time
//! override and the viewport, reacts to host events, and publishes a [`Frame`]
//! after every change. All methods run on the owning task; collaborators that
//! call back from other threads go through the [`EventSink`].

use std::sync::Arc;

use eyeball::SharedObservable;

use super::catalog::ImageCatalog;
use super::image::{ImageInfo, RenderableImage, TimelineImage};
use super::renderer::Renderer;
use super::selector::{Decision, ImageSelector};
use super::sync::PreferenceSyncBridge;
use super::time_override::TimeOverrideController;
use super::viewport::{Viewport, ViewportController};
use crate::config::{
    self, ConfigChange, ConfigStore, Preferences, Subscription, WallpaperSettings, keys,
};
use crate::constants::FIRST_RUN_COLLECTION;
use crate::listeners::ListenerId;
use crate::platform::Clock;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built, no surface yet.
    Uninitialized,
    /// A surface was created at least once.
    Active,
    /// Torn down; every event is ignored.
    Destroyed,
}

/// Whether the engine backs the installed wallpaper or a settings preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionKind {
    #[default]
    Live,
    Preview,
}

impl SessionKind {
    #[must_use]
    pub const fn is_preview(self) -> bool { matches!(self, Self::Preview) }
}

/// Events raised by collaborators on foreign threads.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ConfigChanged(ConfigChange),
    ImageReady(ImageInfo),
}

/// Delivers [`EngineEvent`]s back to the engine's owner.
pub type EventSink = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// Everything the renderer needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: ImageInfo,
    pub width: u32,
    pub height: u32,
    /// Parallax-adjusted crop rectangle.
    pub viewport: Viewport,
    /// Fixed time of day for timeline images, if overriding.
    pub override_time: Option<i64>,
    /// Time of day a timeline image renders at, in milliseconds since midnight.
    pub time_of_day: Option<i64>,
}

impl Frame {
    fn capture(image: &RenderableImage, viewport: Viewport, clock: &dyn Clock) -> Self {
        let timeline = image.as_timeline();
        Self {
            image: image.info().clone(),
            width: image.width(),
            height: image.height(),
            viewport,
            override_time: timeline.and_then(TimelineImage::override_time),
            time_of_day: timeline.map(|timeline| timeline.time_of_day(clock)),
        }
    }
}

/// Collaborators injected into an engine.
pub struct EngineDeps {
    pub catalog: Arc<dyn ImageCatalog>,
    pub store: Arc<dyn ConfigStore>,
    pub renderer: Box<dyn Renderer>,
    pub clock: Arc<dyn Clock>,
}

pub struct Engine {
    state: EngineState,
    session: SessionKind,
    catalog: Arc<dyn ImageCatalog>,
    store: Arc<dyn ConfigStore>,
    renderer: Box<dyn Renderer>,
    clock: Arc<dyn Clock>,
    sink: EventSink,
    selector: ImageSelector,
    time_override: TimeOverrideController,
    viewport: ViewportController,
    sync: PreferenceSyncBridge,
    /// Whether the configured rectangle was applied to a real image yet.
    viewport_restored: bool,
    subscription: Option<Subscription>,
    load_listener: Option<ListenerId>,
    frames: SharedObservable<Frame>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("image", self.selector.current())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Builds an engine and resolves the initial image.
    ///
    /// On first run, when no selector is configured at all, the
    /// [`FIRST_RUN_COLLECTION`] collection is persisted and shown.
    #[must_use]
    pub fn new(deps: EngineDeps, session: SessionKind, sink: EventSink) -> Self {
        let EngineDeps { catalog, store, renderer, clock } = deps;

        let mut settings = WallpaperSettings::read(&store.snapshot(), &WallpaperSettings::default());
        let first_run = settings.has_no_selectors();
        if first_run {
            settings.collection_selector = FIRST_RUN_COLLECTION.to_string();
        }

        let load_sink = Arc::clone(&sink);
        let load_listener = catalog.add_load_listener(Arc::new(move |image: &ImageInfo| {
            load_sink(EngineEvent::ImageReady(image.clone()));
        }));

        let initial_frame =
            Frame::capture(&RenderableImage::placeholder(), Viewport::default(), clock.as_ref());
        let mut engine = Self {
            state: EngineState::Uninitialized,
            session,
            catalog,
            store,
            renderer,
            clock,
            sink,
            selector: ImageSelector::new(),
            time_override: TimeOverrideController::from_settings(
                settings.override_enabled,
                settings.override_day_percent,
            ),
            viewport: ViewportController::new(settings.scale_factor, settings.parallax_enabled),
            sync: PreferenceSyncBridge::new(settings),
            viewport_restored: false,
            subscription: None,
            load_listener: Some(load_listener),
            frames: SharedObservable::new(initial_frame),
        };

        if first_run {
            tracing::info!(collection = FIRST_RUN_COLLECTION, "no selector configured, bootstrapping");
            let mut updates = Preferences::new();
            updates.set(keys::COLLECTION_SELECTOR, FIRST_RUN_COLLECTION);
            engine.persist(updates);
        }

        engine.resolve_initial();
        engine.publish();
        engine
    }

    fn resolve_initial(&mut self) {
        let Some(image) = ImageSelector::resolve_initial(self.sync.settings(), self.catalog.as_ref())
        else {
            tracing::warn!("no image resolved, showing placeholder");
            return;
        };
        self.apply(image);
    }

    /// Applies the configured rectangle, defaulting to the whole image.
    fn restore_viewport(&mut self) {
        let settings = self.sync.settings();
        let (width, height) = self.viewport.image_size();
        #[allow(clippy::cast_precision_loss)]
        let edge = |value: Option<i32>, fallback: u32| value.map_or(fallback as f32, |v| v as f32);
        let rect = Viewport::new(
            edge(settings.viewport_left, 0),
            edge(settings.viewport_top, 0),
            edge(settings.viewport_right, width),
            edge(settings.viewport_bottom, height),
        );
        self.viewport.set_viewport(rect);
        self.viewport.pan(0.0, 0.0);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub const fn state(&self) -> EngineState { self.state }

    #[must_use]
    pub const fn session(&self) -> SessionKind { self.session }

    #[must_use]
    pub const fn current_image(&self) -> &ImageInfo { self.selector.current() }

    #[must_use]
    pub const fn renderable(&self) -> &RenderableImage { self.selector.renderable() }

    #[must_use]
    pub const fn pending_image(&self) -> Option<&ImageInfo> { self.selector.pending() }

    #[must_use]
    pub const fn viewport_controller(&self) -> &ViewportController { &self.viewport }

    #[must_use]
    pub const fn time_override(&self) -> &TimeOverrideController { &self.time_override }

    #[must_use]
    pub const fn settings(&self) -> &WallpaperSettings { self.sync.settings() }

    #[must_use]
    pub const fn last_hour_checked(&self) -> u32 { self.sync.settings().last_hour_checked }

    /// Rectangle the renderer should draw, parallax applied.
    #[must_use]
    pub fn current_viewport(&self) -> Viewport {
        self.viewport.parallax_offset(self.session.is_preview())
    }

    /// Observable holding the latest frame.
    #[must_use]
    pub fn frames(&self) -> SharedObservable<Frame> { self.frames.clone() }

    #[must_use]
    pub fn frame(&self) -> Frame { self.frames.get() }

    const fn is_destroyed(&self) -> bool { matches!(self.state, EngineState::Destroyed) }

    // ========================================================================
    // Lifecycle events
    // ========================================================================

    /// First call activates the engine and subscribes to configuration changes.
    /// Later calls only restart drawing.
    pub fn on_surface_created(&mut self) {
        match self.state {
            EngineState::Destroyed => return,
            EngineState::Uninitialized => {
                self.state = EngineState::Active;
                let sink = Arc::clone(&self.sink);
                self.subscription = Some(config::subscribe(
                    &self.store,
                    Arc::new(move |change: &ConfigChange| {
                        sink(EngineEvent::ConfigChanged(change.clone()));
                    }),
                ));
                tracing::info!(session = ?self.session, "engine active");
            }
            EngineState::Active => {}
        }

        self.renderer.start_drawing();
        self.publish();
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        if self.is_destroyed() {
            return;
        }
        tracing::debug!(width, height, "surface changed");
        self.viewport.surface_changed(width, height);
        self.publish();
    }

    pub fn on_surface_destroyed(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.renderer.stop();
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        if self.is_destroyed() {
            return;
        }
        if visible {
            self.reload_preferences();
        }
        self.renderer.set_visible(visible);
        if visible {
            self.publish();
        }
    }

    pub fn on_offsets_changed(&mut self, offset: f32) {
        if self.is_destroyed() {
            return;
        }
        self.viewport.set_screen_offset(offset);
        self.publish();
    }

    /// Rotates the collection when the hour changed.
    pub fn on_hour_tick(&mut self) {
        if self.is_destroyed() {
            return;
        }

        let hour = self.clock.hour();
        let previous = self.last_hour_checked();
        if hour == previous {
            return;
        }

        tracing::debug!(previous, hour, "hour passed");
        self.sync.record_hour(hour);
        let mut updates = Preferences::new();
        updates.set(keys::LAST_HOUR_CHECKED, hour);
        self.persist(updates);

        if self.sync.settings().collection_selector.trim().is_empty() {
            return;
        }
        if self.resolve_active() == Decision::Apply {
            self.publish();
        }
    }

    pub fn on_image_ready(&mut self, image: &ImageInfo) {
        if self.is_destroyed() {
            return;
        }

        let decision = self.selector.complete_download(
            image,
            self.sync.settings(),
            self.catalog.as_ref(),
            &self.time_override,
        );
        if decision == Decision::Apply {
            self.image_applied();
            self.publish();
        }
    }

    pub fn on_config_changed(&mut self, change: &ConfigChange) {
        if self.is_destroyed() {
            return;
        }

        let resolve = if self.session.is_preview() {
            self.sync.preview_reconcile(
                &change.snapshot,
                &mut self.viewport,
                &mut self.time_override,
                self.selector.timeline_mut(),
            )
        } else {
            self.sync.live_reload(
                &change.snapshot,
                &mut self.viewport,
                &mut self.time_override,
                self.selector.timeline_mut(),
            )
        };

        if resolve {
            self.resolve_active();
        }
        self.publish();
    }

    /// Tears the engine down. Idempotent.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }

        self.renderer.stop();
        self.subscription = None;
        if let Some(id) = self.load_listener.take() {
            self.catalog.remove_load_listener(id);
        }
        self.state = EngineState::Destroyed;
        tracing::info!("engine destroyed");
    }

    // ========================================================================
    // Gestures (preview sessions only)
    // ========================================================================

    pub fn on_scale_gesture(&mut self, multiplier: f32) {
        if self.is_destroyed() || !self.session.is_preview() {
            return;
        }

        self.viewport.set_scale(multiplier);
        let mut updates = self.viewport_updates();
        updates.set(keys::SCALE_FACTOR, f64::from(self.viewport.scale()));
        self.persist(updates);
        self.publish();
    }

    /// Scrubs the time override on timeline images while it is enabled,
    /// pans the viewport otherwise.
    pub fn on_pan_gesture(&mut self, distance_x: f32, distance_y: f32) {
        if self.is_destroyed() || !self.session.is_preview() {
            return;
        }

        if self.time_override.enabled() {
            if let Some(image) = self.selector.timeline_mut() {
                let offset = self.time_override.scrub(distance_x, image);
                tracing::trace!(offset, "time override scrubbed");
                self.publish();
                return;
            }
        }

        self.viewport.pan(distance_x, distance_y);
        let updates = self.viewport_updates();
        self.persist(updates);
        self.publish();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn reload_preferences(&mut self) {
        let snapshot = self.store.snapshot();
        let resolve = self.sync.live_reload(
            &snapshot,
            &mut self.viewport,
            &mut self.time_override,
            self.selector.timeline_mut(),
        );
        if resolve {
            self.resolve_active();
        }
    }

    fn resolve_active(&mut self) -> Decision {
        let settings = self.sync.settings();
        let Some(image) = ImageSelector::resolve(settings.image_mode, settings, self.catalog.as_ref())
        else {
            return Decision::NoOp;
        };
        self.apply(image)
    }

    fn apply(&mut self, image: ImageInfo) -> Decision {
        let decision = self.selector.apply_resolved(image, self.catalog.as_ref(), &self.time_override);
        if decision == Decision::Apply {
            self.image_applied();
        }
        decision
    }

    fn image_applied(&mut self) {
        let image = self.selector.renderable();
        let (width, height) = (image.width(), image.height());
        self.viewport.image_changed(width, height);
        if !self.viewport_restored {
            self.viewport_restored = true;
            self.restore_viewport();
        }
    }

    fn viewport_updates(&self) -> Preferences {
        let [left, top, right, bottom] = self.viewport.viewport().to_ints();
        let mut updates = Preferences::new();
        updates.set(keys::VIEWPORT_LEFT, left);
        updates.set(keys::VIEWPORT_TOP, top);
        updates.set(keys::VIEWPORT_RIGHT, right);
        updates.set(keys::VIEWPORT_BOTTOM, bottom);
        updates
    }

    fn persist(&self, updates: Preferences) {
        if let Err(err) = self.store.persist(updates) {
            tracing::warn!(error = %err, "failed to persist settings");
        }
    }

    /// Publishes the current frame and asks for a redraw.
    fn publish(&mut self) {
        let frame = Frame::capture(
            self.selector.renderable(),
            self.current_viewport(),
            self.clock.as_ref(),
        );
        self.frames.set(frame);
        if self.state == EngineState::Active {
            self.renderer.draw_now();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) { self.destroy(); }
}
