//! Error types for the rendering core.
//!
//! Out-of-bounds pixel writes have no variant; [`Canvas`](crate::canvas::Canvas)
//! clips them.

use alloc::string::String;

/// Invalid static configuration. Fatal to the operation that hit it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Font height outside the supported set.
    #[error("unsupported font height {0}px")]
    UnsupportedFontHeight(u32),

    /// Canvas with a zero dimension or a pixel count that does not fit in memory.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
}

/// Image data that cannot become a [`DecodedImage`](crate::image::DecodedImage).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// No frames, or a frame with zero width or height.
    #[error("image has no pixels")]
    Empty,

    /// Frame at the given index holds for zero time.
    #[error("frame {0} has a zero display duration")]
    ZeroDuration(usize),

    /// Pixel buffer length does not match the declared dimensions.
    #[error("frame {index} has {actual} pixels, expected {expected}")]
    DimensionMismatch { index: usize, expected: usize, actual: usize },

    /// Bytes rejected by the underlying decoder.
    #[error("malformed image data: {0}")]
    Format(String),
}
