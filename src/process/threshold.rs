//! Histogram-driven bright-pixel selection.
//!
//! The board keeps a fixed budget of "bright" pixels per frame. Rather than
//! using a fixed cutoff, it walks the intensity histogram from white towards
//! black until the budget is reached, then marks pixels in scan order.

use crate::image::{Channels, Image, ImageError};

/// Mask value for a selected pixel.
pub const BRIGHT: u8 = 255;
/// Mask value for an unselected pixel.
pub const DARK: u8 = 0;

/// Pixel counts per intensity, index = intensity.
pub type Histogram = [usize; 256];

/// Output of [`threshold`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholded {
    /// Gray image holding only [`BRIGHT`] and [`DARK`] samples
    pub mask: Image,
    /// Intensity cutoff selected from the histogram
    pub threshold: u8,
}

impl Thresholded {
    /// Number of pixels marked [`BRIGHT`].
    pub fn bright_count(&self) -> usize {
        self.mask.data().iter().filter(|&&v| v == BRIGHT).count()
    }
}

/// Count pixels at each intensity of a gray image.
pub fn histogram(gray: &Image) -> Result<Histogram, ImageError> {
    gray.require(Channels::Gray)?;

    let mut hist = [0usize; 256];
    for &v in gray.data() {
        hist[v as usize] += 1;
    }
    Ok(hist)
}

/// Select at most `max_pixels` bright pixels from a gray image.
///
/// The cutoff is the first intensity, scanning from 255 down, at which the
/// cumulative count reaches `max_pixels`. When the whole image holds no more
/// than `max_pixels` pixels the cutoff is 0.
///
/// Pixels at or above the cutoff are then marked in row-major order until
/// the budget runs out. When more than `max_pixels` pixels tie at the cutoff
/// the ones nearest the top-left win, regardless of their intensity. The
/// board does the same, so this is kept as is.
pub fn threshold(gray: &Image, max_pixels: usize) -> Result<Thresholded, ImageError> {
    let hist = histogram(gray)?;
    let cutoff = select_cutoff(&hist, max_pixels, gray.pixel_count());

    let mut selected = 0usize;
    let mask = gray
        .data()
        .iter()
        .map(|&v| {
            if v >= cutoff && selected < max_pixels {
                selected += 1;
                BRIGHT
            } else {
                DARK
            }
        })
        .collect();

    log::debug!(
        "threshold: cutoff={} selected={}/{} (budget {})",
        cutoff,
        selected,
        gray.pixel_count(),
        max_pixels
    );

    Ok(Thresholded {
        mask: Image::from_raw(gray.width(), gray.height(), Channels::Gray, mask)?,
        threshold: cutoff,
    })
}

fn select_cutoff(hist: &Histogram, max_pixels: usize, total: usize) -> u8 {
    if max_pixels >= total {
        return 0;
    }

    let mut cumulative = 0usize;
    for intensity in (0..=255u8).rev() {
        cumulative += hist[intensity as usize];
        if cumulative >= max_pixels {
            return intensity;
        }
    }
    0
}
