//! Rendering core for the LED matrix dashboard.
//!
//! This crate contains the platform-agnostic rendering pipeline shared by
//! every front end (simulated window, headless snapshots, real panels):
//!
//! - [`colors`]: RGB888 color constants and clamped construction
//! - [`config`]: Matrix dimensions, layout positions and animation timing
//! - [`canvas`]: Clipping pixel grid, the unit of composition
//! - [`fonts`]: Glyph renderer with a height-keyed font cache
//! - [`image`]: Decoded image frames and the nearest-neighbor compositor
//! - [`widgets`]: Circle primitives and the weather panel layout
//! - [`present`]: Display driver boundary and the double-buffered presenter
//! - [`animations`]: Easing and the four animation phases
//! - [`scheduler`]: Clock boundary and the phase loop
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` + `alloc`. Tests run on the host with `std` enabled
//! (via `cfg_attr`) so the standard test harness is available.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod animations;
pub mod canvas;
pub mod colors;
pub mod config;
pub mod error;
pub mod fonts;
pub mod image;
pub mod present;
pub mod scheduler;
pub mod widgets;

// Re-export commonly used items
pub use canvas::Canvas;
pub use error::{ConfigError, DecodeError};
pub use fonts::{Font, FontBook, draw_text};
pub use image::{DecodedImage, Frame, draw_frame, draw_image};
pub use present::{FramePresenter, Panel};
pub use scheduler::{Clock, Scheduler};
