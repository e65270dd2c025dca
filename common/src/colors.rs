//! Color constants for the LED matrix.
//!
//! The matrix is driven with 8 bits per channel, so every color in the
//! pipeline is an `embedded_graphics` [`Rgb888`]. Standard colors come from
//! the `RgbColor` trait constants; [`rgb`] builds a color from wider integers
//! by clamping each channel to `0..=255`.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Canvas background and the out-of-bounds sentinel.
pub const BLACK: Rgb888 = Rgb888::BLACK;

/// Pure white.
pub const WHITE: Rgb888 = Rgb888::WHITE;

/// Pure red.
pub const RED: Rgb888 = Rgb888::RED;

/// Pure green.
pub const GREEN: Rgb888 = Rgb888::GREEN;

/// Pure blue.
pub const BLUE: Rgb888 = Rgb888::BLUE;

/// Cyan (0, 255, 255). Default text color for the dashboard and spinner.
pub const CYAN: Rgb888 = Rgb888::CYAN;

// =============================================================================
// Custom Colors (application-specific)
// =============================================================================

/// Warm orange used for the radial progress rings.
pub const AMBER: Rgb888 = Rgb888::new(255, 150, 0);

/// Build a color from arbitrary integer channels, clamping each to `0..=255`.
#[inline]
pub fn rgb(
    r: i32,
    g: i32,
    b: i32,
) -> Rgb888 {
    Rgb888::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
}

#[inline]
fn clamp_channel(value: i32) -> u8 { value.clamp(0, 255) as u8 }
