//! Glyph renderer backed by pre-rasterized fixed-width fonts.
//!
//! Fonts are selected by pixel height from a closed set. Each height maps to
//! one of the classic X11 fixed fonts compiled into `embedded-graphics`:
//!
//! | Height | Face |
//! |--------|------|
//! | 7  | 5x7   |
//! | 8  | 5x8   |
//! | 9  | 6x9   |
//! | 10 | 6x10  |
//! | 12 | 6x12  |
//! | 14 | 7x14  |
//! | 18 | 9x18  |
//! | 20 | 10x20 |
//!
//! Resolution is a pure function of the height, so nothing depends on the
//! process working directory. [`FontBook`] caches resolved handles for its
//! lifetime; an unsupported height is a [`ConfigError`], never a fallback.
//!
//! # Anchor Convention
//!
//! Callers pass a top-left-ish anchor `(x, y)`. The renderer puts the text
//! baseline `height` pixels *below* `y`, so successive lines can be laid out
//! by stepping `y` by the font height.

use core::fmt;

use embedded_graphics::mono_font::iso_8859_1::{
    FONT_5X7,
    FONT_5X8,
    FONT_6X9,
    FONT_6X10,
    FONT_6X12,
    FONT_7X14,
    FONT_9X18,
    FONT_10X20,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::LinearMap;
use log::debug;

use crate::canvas::Canvas;
use crate::error::ConfigError;

/// Every font height the renderer accepts, ascending.
pub const SUPPORTED_HEIGHTS: [u32; 8] = [7, 8, 9, 10, 12, 14, 18, 20];

/// Handle to a resolved font.
#[derive(Clone, Copy)]
pub struct Font {
    height: u32,
    face: &'static MonoFont<'static>,
}

impl Font {
    /// Resolve a font by pixel height.
    pub fn load(height: u32) -> Result<Self, ConfigError> {
        let face = match height {
            7 => &FONT_5X7,
            8 => &FONT_5X8,
            9 => &FONT_6X9,
            10 => &FONT_6X10,
            12 => &FONT_6X12,
            14 => &FONT_7X14,
            18 => &FONT_9X18,
            20 => &FONT_10X20,
            _ => return Err(ConfigError::UnsupportedFontHeight(height)),
        };
        Ok(Self { height, face })
    }

    /// Nominal pixel height this font was requested with.
    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// Horizontal distance between successive glyph origins.
    #[inline]
    pub const fn advance(&self) -> i32 { (self.face.character_size.width + self.face.character_spacing) as i32 }

    /// Width `text` would occupy: the sum of the glyph advances of its first line.
    pub fn text_width(
        &self,
        text: &str,
    ) -> i32 {
        first_line(text).chars().count() as i32 * self.advance()
    }

    /// Draw a single line of text and return the width consumed.
    ///
    /// The baseline sits `height` pixels below `y`. Anything from the first
    /// line break on is not drawn. Glyphs falling outside the canvas are
    /// clipped.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb888,
    ) -> i32 {
        let style = MonoTextStyle::new(self.face, color);
        let baseline = Point::new(x, y + self.height as i32);
        Text::with_baseline(first_line(text), baseline, style, Baseline::Alphabetic)
            .draw(canvas)
            .ok();
        self.text_width(text)
    }
}

/// Text up to the first `\r` or `\n`.
fn first_line(text: &str) -> &str { text.split(['\r', '\n']).next().unwrap_or_default() }

impl fmt::Debug for Font {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Font")
            .field("height", &self.height)
            .field("glyph", &self.face.character_size)
            .finish()
    }
}

impl PartialEq for Font {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.height == other.height
    }
}

impl Eq for Font {}

// =============================================================================
// Font Cache
// =============================================================================

/// Height-keyed font cache.
///
/// Capacity equals the number of supported heights, so every valid height
/// fits and nothing is ever evicted.
#[derive(Default)]
pub struct FontBook {
    loaded: LinearMap<u32, Font, { SUPPORTED_HEIGHTS.len() }>,
}

impl FontBook {
    /// Create an empty cache.
    pub fn new() -> Self { Self::default() }

    /// Get the font for `height`, resolving it on first use.
    pub fn font(
        &mut self,
        height: u32,
    ) -> Result<Font, ConfigError> {
        if let Some(font) = self.loaded.get(&height) {
            return Ok(*font);
        }

        let font = Font::load(height)?;
        self.loaded.insert(height, font).ok();
        debug!("Loaded {}px font ({} cached)", height, self.loaded.len());
        Ok(font)
    }

    /// Number of distinct heights resolved so far.
    #[inline]
    pub fn loaded(&self) -> usize { self.loaded.len() }
}

/// Draw `text` with the font of `font_height` and return the width consumed.
///
/// Fails with [`ConfigError::UnsupportedFontHeight`] before touching the
/// canvas if the height is not supported.
pub fn draw_text(
    canvas: &mut Canvas,
    fonts: &mut FontBook,
    font_height: u32,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb888,
) -> Result<i32, ConfigError> {
    let font = fonts.font(font_height)?;
    Ok(font.draw(canvas, x, y, text, color))
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================
