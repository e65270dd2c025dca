//! Decoded images and the image compositor.
//!
//! A [`DecodedImage`] is what the decoding boundary hands to the core: one
//! or more equally sized RGB frames, each with a positive display duration.
//! Still images are a single frame.
//!
//! # Resampling
//!
//! [`draw_image`] and [`draw_frame`] resize with nearest-neighbor sampling:
//!
//! ```text
//! src_x = dst_x * src_width  / target_width
//! src_y = dst_y * src_height / target_height
//! ```
//!
//! Nothing is cached between calls; each blit resamples again, which costs
//! `O(target_width * target_height)` per frame.

use alloc::vec::Vec;
use core::time::Duration;

use embedded_graphics::Pixel;
use embedded_graphics::image::{Image, ImageDrawable};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::canvas::Canvas;
use crate::error::DecodeError;

/// Display duration given to single-frame images.
pub const STILL_FRAME_DURATION: Duration = Duration::from_secs(1);

/// One RGB frame of a decoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
    duration: Duration,
}

impl Frame {
    /// Frame width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    /// Frame height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// How long this frame stays on screen during playback. Always positive.
    #[inline]
    pub const fn duration(&self) -> Duration { self.duration }

    /// Row-major samples.
    #[inline]
    pub fn pixels(&self) -> &[Rgb888] { &self.pixels }

    /// Resample to `width x height` with nearest-neighbor sampling.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
    ) -> Bitmap {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for dy in 0..height {
            let sy = (u64::from(dy) * u64::from(self.height) / u64::from(height)) as usize;
            let row = sy * self.width as usize;
            for dx in 0..width {
                let sx = (u64::from(dx) * u64::from(self.width) / u64::from(width)) as usize;
                pixels.push(self.pixels[row + sx]);
            }
        }
        Bitmap { width, height, pixels }
    }
}

/// Validated, restartable image: a non-empty list of equally sized frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
}

impl DecodedImage {
    /// Build a single-frame image from row-major samples.
    pub fn still(
        width: u32,
        height: u32,
        pixels: Vec<Rgb888>,
    ) -> Result<Self, DecodeError> {
        Self::animated(width, height, [(pixels, STILL_FRAME_DURATION)])
    }

    /// Build a multi-frame image from `(samples, display duration)` pairs.
    ///
    /// Rejects empty images, zero durations and buffers whose length does not
    /// match `width * height`.
    pub fn animated<I>(
        width: u32,
        height: u32,
        frames: I,
    ) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = (Vec<Rgb888>, Duration)>,
    {
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty);
        }
        let expected = width as usize * height as usize;

        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(index, (pixels, duration))| {
                if pixels.len() != expected {
                    return Err(DecodeError::DimensionMismatch { index, expected, actual: pixels.len() });
                }
                if duration.is_zero() {
                    return Err(DecodeError::ZeroDuration(index));
                }
                Ok(Frame { width, height, pixels, duration })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if frames.is_empty() {
            return Err(DecodeError::Empty);
        }

        Ok(Self { width, height, frames })
    }

    /// Source width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    /// Source height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// All frames in playback order.
    #[inline]
    pub fn frames(&self) -> &[Frame] { &self.frames }

    /// Number of frames (at least one).
    #[inline]
    pub fn frame_count(&self) -> usize { self.frames.len() }

    /// Frame shown first, and the only frame of a still image.
    #[inline]
    pub fn first_frame(&self) -> &Frame { &self.frames[0] }

    /// Whether this image has more than one frame.
    #[inline]
    pub fn is_animated(&self) -> bool { self.frames.len() > 1 }

    /// Length of one full pass through every frame.
    pub fn total_duration(&self) -> Duration { self.frames.iter().map(Frame::duration).sum() }
}

// =============================================================================
// Resized Bitmap
// =============================================================================

/// Frame resampled to its on-screen size, ready to blit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl Bitmap {
    /// Row-major samples.
    #[inline]
    pub fn pixels(&self) -> &[Rgb888] { &self.pixels }

    fn pixel(
        &self,
        point: Point,
    ) -> Rgb888 {
        self.pixels[point.y as usize * self.width as usize + point.x as usize]
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl ImageDrawable for Bitmap {
    type Color = Rgb888;

    fn draw<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        target.fill_contiguous(&self.bounding_box(), self.pixels.iter().copied())
    }

    fn draw_sub_image<D>(
        &self,
        target: &mut D,
        area: &Rectangle,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let area = area.intersection(&self.bounding_box());
        let origin = area.top_left;
        target.draw_iter(area.points().map(|point| Pixel(point - origin, self.pixel(point))))
    }
}

// =============================================================================
// Compositor
// =============================================================================

/// Resize the first frame of `image` to `target_width x target_height` and
/// blit it with its top-left corner at `(x, y)`.
pub fn draw_image(
    canvas: &mut Canvas,
    image: &DecodedImage,
    target_width: u32,
    target_height: u32,
    x: i32,
    y: i32,
) {
    draw_frame(canvas, image.first_frame(), target_width, target_height, x, y);
}

/// Resize `frame` and blit it at `(x, y)`. Off-canvas pixels are clipped;
/// a zero target size draws nothing.
pub fn draw_frame(
    canvas: &mut Canvas,
    frame: &Frame,
    target_width: u32,
    target_height: u32,
    x: i32,
    y: i32,
) {
    if target_width == 0 || target_height == 0 {
        return;
    }
    let bitmap = frame.resize(target_width, target_height);
    Image::new(&bitmap, Point::new(x, y)).draw(canvas).ok();
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================
