//! Off-screen pixel grid.
//!
//! A [`Canvas`] is a dense row-major grid of [`Rgb888`] samples with fixed
//! dimensions. All composition (text, images, circles) lands here before the
//! [`FramePresenter`](crate::present::FramePresenter) hands it to the panel.
//!
//! # Clipping Policy
//!
//! Writes outside `[0, width) x [0, height)` are silently ignored. Reads
//! outside the canvas return [`OUT_OF_BOUNDS`].

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::colors::BLACK;
use crate::error::ConfigError;

/// Value returned by [`Canvas::get_pixel`] for coordinates outside the canvas.
pub const OUT_OF_BOUNDS: Rgb888 = BLACK;

/// Fixed-size RGB pixel grid with clipping writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl Canvas {
    /// Allocate a black canvas.
    ///
    /// Fails if either dimension is zero or the pixel count overflows.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&len| len > 0)
            .ok_or(ConfigError::InvalidCanvasSize { width, height })?;

        Ok(Self { width, height, pixels: vec![BLACK; len] })
    }

    /// Canvas width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    /// Canvas height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// Row-major pixel storage.
    #[inline]
    pub fn pixels(&self) -> &[Rgb888] { &self.pixels }

    /// Reset every pixel to black.
    pub fn clear(&mut self) { self.pixels.fill(BLACK); }

    /// Write one pixel. Out-of-bounds coordinates are a no-op.
    #[inline]
    pub fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb888,
    ) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Read one pixel, or [`OUT_OF_BOUNDS`] outside the canvas.
    #[inline]
    pub fn get_pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Rgb888 {
        self.index(x, y).map_or(OUT_OF_BOUNDS, |idx| self.pixels[idx])
    }

    /// Whether `(x, y)` addresses a pixel on this canvas.
    #[inline]
    pub fn contains(
        &self,
        x: i32,
        y: i32,
    ) -> bool {
        self.index(x, y).is_some()
    }

    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }
}

// =============================================================================
// embedded-graphics integration
// =============================================================================

impl OriginDimensions for Canvas {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    /// Every pixel goes through [`Canvas::set_pixel`], so standard
    /// primitives and text inherit the clipping policy.
    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================
