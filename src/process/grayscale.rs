//! RGB to intensity reduction using the board's integer luminance weights.

use crate::image::{Channels, Image, ImageError};

pub const RED_WEIGHT: u32 = 30;
pub const GREEN_WEIGHT: u32 = 59;
pub const BLUE_WEIGHT: u32 = 11;
/// Sum of the three weights; the divisor of the luminance formula.
pub const WEIGHT_SCALE: u32 = 100;

/// Convert an RGB image to a single-channel intensity image.
///
/// Each pixel becomes `(30*R + 59*G + 11*B) / 100` with truncating division,
/// matching the microcontroller pipeline bit for bit. The weights sum to
/// 100 so the result never exceeds 255.
///
/// Fails with [`ImageError::ChannelMismatch`] for anything but RGB input.
pub fn reduce(image: &Image) -> Result<Image, ImageError> {
    image.require(Channels::Rgb)?;

    let gray = image
        .data()
        .chunks_exact(3)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect();

    Image::from_raw(image.width(), image.height(), Channels::Gray, gray)
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = RED_WEIGHT * u32::from(r) + GREEN_WEIGHT * u32::from(g) + BLUE_WEIGHT * u32::from(b);
    // At most 255 * WEIGHT_SCALE before the division
    (weighted / WEIGHT_SCALE) as u8
}
