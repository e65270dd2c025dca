//! Double-buffered frame presentation.
//!
//! The [`FramePresenter`] owns the canvas currently on screen ("front") and
//! hands out exactly one canvas for drawing ("back"). Each
//! [`swap_and_present`](FramePresenter::swap_and_present) gives the finished
//! back canvas to the panel and returns the previous front canvas as the new
//! back buffer:
//!
//! ```text
//!        draw            swap_and_present(A)          draw
//! back: [A] -------> panel shows A, back: [B] -------> ...
//! front: B                front: A
//! ```
//!
//! The panel therefore only ever receives fully drawn frames, and the
//! canvas returned by a swap is never the one just presented.

use embedded_graphics::prelude::Size;
use log::{debug, info};

use crate::canvas::Canvas;
use crate::error::ConfigError;

/// Display driver boundary.
///
/// Implementations own whatever wiring and timing the hardware needs; the
/// core only sees the panel size and a blocking present call.
pub trait Panel {
    /// Panel dimensions in pixels, fixed for the panel's lifetime.
    fn size(&self) -> Size;

    /// Show `frame`. Blocks until the panel has latched it (the vsync
    /// boundary); this is the only suspension point of the render loop.
    fn present(
        &mut self,
        frame: &Canvas,
    );
}

/// Front/back canvas pair plus the panel it presents to.
pub struct FramePresenter<P> {
    panel: P,
    front: Canvas,
    spare: Option<Canvas>,
    frames_presented: u64,
}

impl<P: Panel> FramePresenter<P> {
    /// Allocate both canvases at the panel's size.
    pub fn new(panel: P) -> Result<Self, ConfigError> {
        let size = panel.size();
        let front = Canvas::new(size.width, size.height)?;
        let spare = front.clone();
        info!("Frame presenter ready: {}x{} double buffer", size.width, size.height);

        Ok(Self { panel, front, spare: Some(spare), frames_presented: 0 })
    }

    /// Issue the initial back buffer. Returns `None` on every call after the first.
    pub fn create_canvas(&mut self) -> Option<Canvas> { self.spare.take() }

    /// Present `back` and return the previous front canvas for the next frame.
    pub fn swap_and_present(
        &mut self,
        back: Canvas,
    ) -> Canvas {
        debug_assert_eq!(
            (back.width(), back.height()),
            (self.front.width(), self.front.height()),
            "back buffer must match the panel size"
        );

        self.panel.present(&back);
        self.frames_presented += 1;
        if self.frames_presented.is_multiple_of(1000) {
            debug!("{} frames presented", self.frames_presented);
        }

        core::mem::replace(&mut self.front, back)
    }

    /// Canvas currently on screen.
    #[inline]
    pub const fn front(&self) -> &Canvas { &self.front }

    /// Total swaps since construction.
    #[inline]
    pub const fn frames_presented(&self) -> u64 { self.frames_presented }

    /// Driver this presenter writes to.
    #[inline]
    pub const fn panel(&self) -> &P { &self.panel }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::colors::{BLACK, BLUE, RED};

    /// Panel that keeps a copy of every presented frame.
    pub(crate) struct RecordingPanel {
        pub size: Size,
        pub shown: Vec<Canvas>,
    }

    impl RecordingPanel {
        pub(crate) fn new(
            width: u32,
            height: u32,
        ) -> Self {
            Self { size: Size::new(width, height), shown: Vec::new() }
        }
    }

    impl Panel for RecordingPanel {
        fn size(&self) -> Size { self.size }

        fn present(
            &mut self,
            frame: &Canvas,
        ) {
            self.shown.push(frame.clone());
        }
    }

    #[test]
    fn test_create_canvas_issued_once() {
        let mut presenter = FramePresenter::new(RecordingPanel::new(64, 64)).unwrap();
        let back = presenter.create_canvas().expect("first call issues the back buffer");
        assert_eq!((back.width(), back.height()), (64, 64));
        assert!(presenter.create_canvas().is_none());
    }

    #[test]
    fn test_invalid_panel_size_rejected() {
        assert!(matches!(
            FramePresenter::new(RecordingPanel::new(0, 32)),
            Err(ConfigError::InvalidCanvasSize { width: 0, height: 32 })
        ));
    }

    #[test]
    fn test_swap_returns_previous_front() {
        let mut presenter = FramePresenter::new(RecordingPanel::new(8, 8)).unwrap();
        let back = presenter.create_canvas().unwrap();

        let initial_front = presenter.front().pixels().as_ptr();
        let presented = back.pixels().as_ptr();

        let next = presenter.swap_and_present(back);
        assert_ne!(next.pixels().as_ptr(), presented, "never the canvas just presented");
        assert_eq!(next.pixels().as_ptr(), initial_front, "the canvas that was front before the call");
        assert_eq!(presenter.front().pixels().as_ptr(), presented);
    }

    #[test]
    fn test_ping_pong_alternates_two_buffers() {
        let mut presenter = FramePresenter::new(RecordingPanel::new(4, 4)).unwrap();
        let mut back = presenter.create_canvas().unwrap();
        let a = back.pixels().as_ptr();
        let b = presenter.front().pixels().as_ptr();
        assert_ne!(a, b);

        for i in 0..10 {
            let drawn = back.pixels().as_ptr();
            let front_before = presenter.front().pixels().as_ptr();
            back = presenter.swap_and_present(back);
            assert_eq!(back.pixels().as_ptr(), front_before);
            assert_eq!(drawn, if i % 2 == 0 { a } else { b });
        }
        assert_eq!(presenter.frames_presented(), 10);
    }

    #[test]
    fn test_panel_sees_complete_frames() {
        let mut presenter = FramePresenter::new(RecordingPanel::new(4, 4)).unwrap();
        let mut back = presenter.create_canvas().unwrap();

        for color in [RED, BLUE, RED] {
            back.clear();
            for y in 0..4 {
                for x in 0..4 {
                    back.set_pixel(x, y, color);
                }
            }
            back = presenter.swap_and_present(back);
        }

        let shown = &presenter.panel().shown;
        assert_eq!(shown.len(), 3);
        assert!(shown[0].pixels().iter().all(|&p| p == RED));
        assert!(shown[1].pixels().iter().all(|&p| p == BLUE));
        assert!(shown[2].pixels().iter().all(|&p| p == RED));
        assert!(back.pixels().iter().all(|&p| p == BLUE), "returned buffer holds the older frame");
        assert_ne!(back.get_pixel(0, 0), BLACK);
    }
}
