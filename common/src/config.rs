//! Matrix layout and animation timing constants.
//!
//! Positions are the top-left anchors passed to [`draw_text`](crate::fonts::draw_text);
//! the glyph renderer places the baseline one font height below them.

use core::time::Duration;

// =============================================================================
// Display Configuration
// =============================================================================

/// Default matrix width in pixels (64x64 HUB75 panel).
pub const MATRIX_WIDTH: u32 = 64;

/// Default matrix height in pixels.
pub const MATRIX_HEIGHT: u32 = 64;

// =============================================================================
// Weather Panel Layout
// =============================================================================

/// Font height for every line of the weather panel.
pub const PANEL_FONT_HEIGHT: u32 = 7;

/// Left margin shared by all panel elements.
pub const PANEL_X: i32 = 5;

/// Location name line.
pub const LOCATION_Y: i32 = 10;

/// Temperature line.
pub const TEMPERATURE_Y: i32 = 20;

/// Top edge of the condition icon.
pub const ICON_Y: i32 = 30;

/// Icon is resized to a square of this many pixels.
pub const ICON_SIZE: u32 = 20;

/// "No icon" fallback line.
pub const NO_ICON_Y: i32 = 40;

// =============================================================================
// Animation Timing
// =============================================================================

/// Spinner glyph font height.
pub const SPINNER_FONT_HEIGHT: u32 = 10;

/// Spinner anchor (top-left of the glyph box).
pub const SPINNER_X: i32 = 30;

/// Spinner anchor row.
pub const SPINNER_Y: i32 = 30;

/// Time each spinner glyph stays on screen.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// Default length of the loading spinner.
pub const LOADING_DURATION: Duration = Duration::from_secs(3);

/// Time per scroll step (one pixel to the left).
pub const SCROLL_TICK: Duration = Duration::from_millis(50);

/// Frame time for the radial fill animation (~50 FPS).
pub const RADIAL_FRAME_TIME: Duration = Duration::from_millis(20);

/// Period of the three-segment radial fill cycle.
pub const RADIAL_PERIOD: Duration = Duration::from_secs(3);
