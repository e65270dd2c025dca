//! Host display drivers.
//!
//! Both drivers mirror every presented canvas into an
//! `embedded_graphics_simulator::SimulatorDisplay`, which is also what the
//! PNG snapshot is rendered from:
//!
//! - [`SnapshotPanel`]: headless, for CI and machines without SDL
//! - [`WindowPanel`]: SDL window, behind the `window` feature

use std::path::Path;

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettings, OutputSettingsBuilder, SimulatorDisplay};
use log::info;
use matrix_common::{Canvas, Panel};

/// Driver backed by a [`SimulatorDisplay`].
pub trait HostPanel: Panel {
    fn display(&self) -> &SimulatorDisplay<Rgb888>;

    fn output_settings(&self) -> &OutputSettings;

    /// Write the frame currently on the display to `path` as PNG.
    fn save_snapshot(
        &self,
        path: &Path,
    ) -> Result<()> {
        self.display()
            .to_rgb_output_image(self.output_settings())
            .save_png(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!("Snapshot written to {}", path.display());
        Ok(())
    }
}

fn mirror(
    display: &mut SimulatorDisplay<Rgb888>,
    frame: &Canvas,
) {
    let area = display.bounding_box();
    display.fill_contiguous(&area, frame.pixels().iter().copied()).ok();
}

// =============================================================================
// Headless
// =============================================================================

/// Headless panel; keeps the last presented frame for snapshots.
pub struct SnapshotPanel {
    display: SimulatorDisplay<Rgb888>,
    settings: OutputSettings,
}

impl SnapshotPanel {
    pub fn new(
        size: Size,
        scale: u32,
    ) -> Self {
        Self {
            display: SimulatorDisplay::new(size),
            settings: OutputSettingsBuilder::new().scale(scale).build(),
        }
    }
}

impl Panel for SnapshotPanel {
    fn size(&self) -> Size { self.display.size() }

    fn present(
        &mut self,
        frame: &Canvas,
    ) {
        mirror(&mut self.display, frame);
    }
}

impl HostPanel for SnapshotPanel {
    fn display(&self) -> &SimulatorDisplay<Rgb888> { &self.display }

    fn output_settings(&self) -> &OutputSettings { &self.settings }
}

// =============================================================================
// SDL Window
// =============================================================================

#[cfg(feature = "window")]
pub use window::WindowPanel;

#[cfg(feature = "window")]
mod window {
    use embedded_graphics_simulator::{SimulatorEvent, Window};

    use super::*;
    use crate::timing::StopToken;

    /// SDL window panel. Closing the window stops the shared [`StopToken`].
    pub struct WindowPanel {
        display: SimulatorDisplay<Rgb888>,
        settings: OutputSettings,
        window: Window,
        stop: StopToken,
    }

    impl WindowPanel {
        pub fn new(
            size: Size,
            scale: u32,
            title: &str,
            stop: StopToken,
        ) -> Self {
            let settings = OutputSettingsBuilder::new().scale(scale).pixel_spacing(1).build();
            let window = Window::new(title, &settings);
            Self { display: SimulatorDisplay::new(size), settings, window, stop }
        }
    }

    impl Panel for WindowPanel {
        fn size(&self) -> Size { self.display.size() }

        fn present(
            &mut self,
            frame: &Canvas,
        ) {
            mirror(&mut self.display, frame);
            self.window.update(&self.display);

            if self.window.events().any(|event| matches!(event, SimulatorEvent::Quit)) {
                info!("Window closed");
                self.stop.stop();
            }
        }
    }

    impl HostPanel for WindowPanel {
        fn display(&self) -> &SimulatorDisplay<Rgb888> { &self.display }

        fn output_settings(&self) -> &OutputSettings { &self.settings }
    }
}
