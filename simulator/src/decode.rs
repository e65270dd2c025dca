//! Encoded image bytes to [`DecodedImage`].
//!
//! GIFs keep every frame with its delay. Every other format yields a single
//! still frame. Alpha is dropped.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, RgbImage};
use log::debug;
use matrix_common::{DecodeError, DecodedImage};

/// Delay used for GIF frames that declare none.
pub const DEFAULT_GIF_DELAY: Duration = Duration::from_millis(100);

fn format_error(err: &image::ImageError) -> DecodeError { DecodeError::Format(err.to_string()) }

fn to_pixels(buffer: &RgbImage) -> Vec<Rgb888> { buffer.pixels().map(|p| Rgb888::new(p[0], p[1], p[2])).collect() }

/// Decode `bytes`, sniffing the format from its header.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(bytes).map_err(|e| format_error(&e))?;
    if format == ImageFormat::Gif {
        return decode_gif(bytes);
    }

    let buffer = image::load_from_memory_with_format(bytes, format).map_err(|e| format_error(&e))?.to_rgb8();
    let (width, height) = buffer.dimensions();
    debug!("Decoded {format:?} still {width}x{height}");
    DecodedImage::still(width, height, to_pixels(&buffer))
}

fn decode_gif(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(|e| format_error(&e))?;
    let frames = decoder.into_frames().collect_frames().map_err(|e| format_error(&e))?;

    let Some(first) = frames.first() else {
        return Err(DecodeError::Empty);
    };
    let (width, height) = first.buffer().dimensions();

    let mut decoded = Vec::with_capacity(frames.len());
    for frame in frames {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let mut delay = Duration::from_millis(u64::from(numer) / u64::from(denom.max(1)));
        if delay.is_zero() {
            delay = DEFAULT_GIF_DELAY;
        }
        let rgb = image::DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
        decoded.push((to_pixels(&rgb), delay));
    }

    debug!("Decoded GIF {width}x{height} with {} frames", decoded.len());
    DecodedImage::animated(width, height, decoded)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> anyhow::Result<DecodedImage> {
    use anyhow::Context;

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decoding {}", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    use super::*;

    pub(crate) fn png_bytes(
        width: u32,
        height: u32,
        color: [u8; 3],
    ) -> Vec<u8> {
        let buffer = RgbImage::from_pixel(width, height, image::Rgb(color));
        let mut out = Cursor::new(Vec::new());
        buffer.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn gif_bytes(frames: &[([u8; 3], u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            for &([r, g, b], delay_ms) in frames {
                let buffer = RgbaImage::from_pixel(2, 2, Rgba([r, g, b, 255]));
                let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        out
    }

    #[test]
    fn test_png_is_single_still_frame() {
        let image = decode_image(&png_bytes(3, 2, [255, 0, 0])).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.frame_count(), 1);
        assert!(!image.is_animated());
        assert!(image.first_frame().pixels().iter().all(|&p| p == Rgb888::new(255, 0, 0)));
    }

    #[test]
    fn test_gif_keeps_frames_and_delays() {
        let image = decode_image(&gif_bytes(&[([255, 0, 0], 100), ([0, 255, 0], 250)])).unwrap();
        assert_eq!(image.frame_count(), 2);
        assert_eq!(image.frames()[0].duration(), Duration::from_millis(100));
        assert_eq!(image.frames()[1].duration(), Duration::from_millis(250));
        assert_eq!(image.frames()[1].pixels()[0], Rgb888::new(0, 255, 0));
    }

    #[test]
    fn test_gif_zero_delay_uses_default() {
        let image = decode_image(&gif_bytes(&[([0, 0, 255], 0)])).unwrap();
        assert_eq!(image.first_frame().duration(), DEFAULT_GIF_DELAY);
    }

    #[test]
    fn test_garbage_and_empty_rejected() {
        assert_eq!(decode_image(&[]), Err(DecodeError::Empty));
        assert!(matches!(decode_image(b"definitely not an image"), Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_load_image_missing_file() {
        assert!(load_image(Path::new("/nonexistent/never.gif")).is_err());
    }
}
