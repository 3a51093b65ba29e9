//! Image validation error types

use thiserror::Error;

use super::types::Channels;

/// Errors raised when an image or a stage parameter is rejected.
///
/// Every stage is a pure function of its inputs, so none of these are
/// transient: a call either returns a complete image or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Width or height is zero
    #[error("invalid image dimensions {width}x{height}: width and height must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
    /// Scale factor is not positive, or it collapses the image to zero size
    #[error("invalid scale factor {num}/{den}: numerator and denominator must be positive and produce a non-empty image")]
    InvalidScale { num: i64, den: i64 },
    /// A sample value outside 0..=255 was supplied
    #[error("sample {index} has value {value}, expected 0..=255")]
    InvalidChannelData { index: usize, value: i64 },
    /// Pixel buffer length does not match width * height * channels
    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    /// A stage received an image with the wrong channel layout
    #[error("expected a {expected} image, got {actual}")]
    ChannelMismatch { expected: Channels, actual: Channels },
}
