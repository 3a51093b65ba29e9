//! Conversion between encoded image files and [`Image`] buffers.
//!
//! Decoding and encoding is delegated to the `image` crate; this module only
//! maps its pixel buffers onto our gray/RGB layouts.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::image::{Channels, Image, ImageError};

/// Errors raised while reading or writing encoded images.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to read image '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: ::image::ImageError,
    },
    #[error("failed to decode image payload: {0}")]
    Decode(#[source] ::image::ImageError),
    #[error("failed to write image '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: ::image::ImageError,
    },
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Decode an in-memory JPEG/PNG/... payload, e.g. a frame received from the
/// camera.
pub fn decode(bytes: &[u8]) -> Result<Image, RasterError> {
    let decoded = ::image::load_from_memory(bytes).map_err(RasterError::Decode)?;
    Ok(from_dynamic(decoded)?)
}

/// Load an image file. Gray sources stay single-channel, everything else
/// becomes RGB.
pub fn load(path: &Path) -> Result<Image, RasterError> {
    let decoded = ::image::open(path).map_err(|source| RasterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(from_dynamic(decoded)?)
}

/// Write an image; the format follows the file extension.
pub fn save(image: &Image, path: &Path) -> Result<(), RasterError> {
    let color = match image.channels() {
        Channels::Gray => ::image::ColorType::L8,
        Channels::Rgb => ::image::ColorType::Rgb8,
    };
    ::image::save_buffer(path, image.data(), image.width(), image.height(), color).map_err(
        |source| RasterError::Write {
            path: path.to_path_buf(),
            source,
        },
    )?;
    log::debug!(
        "wrote {} ({}x{} {})",
        path.display(),
        image.width(),
        image.height(),
        image.channels()
    );
    Ok(())
}

fn from_dynamic(decoded: ::image::DynamicImage) -> Result<Image, ImageError> {
    if decoded.color().has_color() {
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Image::from_raw(width, height, Channels::Rgb, rgb.into_raw())
    } else {
        let gray = decoded.to_luma8();
        let (width, height) = gray.dimensions();
        Image::from_raw(width, height, Channels::Gray, gray.into_raw())
    }
}
