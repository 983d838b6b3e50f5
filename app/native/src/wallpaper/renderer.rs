//! Drawing surface driven by the engine.
//!
//! The renderer reads [`super::engine::Frame`]s from the engine's observable
//! and paints them; the engine only tells it when to start, stop and redraw.

/// Host drawing loop.
pub trait Renderer: Send {
    /// Starts (or restarts) the drawing loop.
    fn start_drawing(&mut self);

    /// Stops drawing and releases the surface.
    fn stop(&mut self);

    fn set_visible(&mut self, visible: bool);

    /// Requests an immediate redraw. Must not block.
    fn draw_now(&mut self);
}

/// Renderer that only logs, used by headless sessions.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    drawing: bool,
    visible: bool,
    frames_requested: u64,
}

impl TracingRenderer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn is_drawing(&self) -> bool { self.drawing }

    #[must_use]
    pub const fn is_visible(&self) -> bool { self.visible }

    #[must_use]
    pub const fn frames_requested(&self) -> u64 { self.frames_requested }
}

impl Renderer for TracingRenderer {
    fn start_drawing(&mut self) {
        self.drawing = true;
        self.visible = true;
        tracing::info!("renderer started");
    }

    fn stop(&mut self) {
        self.drawing = false;
        tracing::info!(frames = self.frames_requested, "renderer stopped");
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        tracing::debug!(visible, "renderer visibility changed");
    }

    fn draw_now(&mut self) {
        if !self.drawing || !self.visible {
            return;
        }
        self.frames_requested += 1;
        tracing::trace!(frame = self.frames_requested, "draw requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_counts_only_while_drawing_and_visible() {
        let mut renderer = TracingRenderer::new();
        renderer.draw_now();
        assert_eq!(renderer.frames_requested(), 0);

        renderer.start_drawing();
        renderer.draw_now();
        renderer.set_visible(false);
        renderer.draw_now();
        assert_eq!(renderer.frames_requested(), 1);

        renderer.set_visible(true);
        renderer.stop();
        renderer.draw_now();
        assert_eq!(renderer.frames_requested(), 1);
        assert!(!renderer.is_drawing());
    }
}
