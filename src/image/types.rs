//! Image buffer types.

use std::fmt;

use super::error::ImageError;

/// Channel layout of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Single intensity sample per pixel
    Gray,
    /// Red, green and blue samples per pixel, in that order
    Rgb,
}

impl Channels {
    /// Number of samples stored per pixel.
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channels::Gray => write!(f, "gray"),
            Channels::Rgb => write!(f, "rgb"),
        }
    }
}

/// A rectangular image held in one contiguous row-major buffer.
///
/// Sample `c` of pixel `(x, y)` lives at `(y * width + x) * channels + c`.
/// The geometry is validated on construction and never changes afterwards;
/// stages read an `Image` and allocate a fresh one for their output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl Image {
    /// Wrap an existing sample buffer.
    ///
    /// Fails with [`ImageError::InvalidDimensions`] if either side is zero and
    /// with [`ImageError::BufferLength`] if `data` is not exactly
    /// `width * height * channels` samples long.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = checked_len(width, height, channels)?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build an image from wide integer samples, rejecting anything outside
    /// `0..=255` instead of wrapping it.
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: Channels,
        samples: &[i32],
    ) -> Result<Self, ImageError> {
        let expected = checked_len(width, height, channels)?;
        if samples.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                actual: samples.len(),
            });
        }

        let data = samples
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u8::try_from(value).map_err(|_| ImageError::InvalidChannelData {
                    index,
                    value: i64::from(value),
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y, channel)` for every sample in
    /// row-major order.
    pub fn from_fn<F>(width: u32, height: u32, channels: Channels, mut f: F) -> Result<Self, ImageError>
    where
        F: FnMut(u32, u32, usize) -> u8,
    {
        let len = checked_len(width, height, channels)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels.count() {
                    data.push(f(x, y, c));
                }
            }
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw samples in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its sample buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// All samples of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.channels.count();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.data.get(start..start + bpp)
    }

    /// Make sure the image has the layout a stage expects.
    pub(crate) fn require(&self, expected: Channels) -> Result<(), ImageError> {
        if self.channels == expected {
            Ok(())
        } else {
            Err(ImageError::ChannelMismatch {
                expected,
                actual: self.channels,
            })
        }
    }
}

/// Sample count for the given geometry, rejecting zero-area images.
fn checked_len(width: u32, height: u32, channels: Channels) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels.count()))
        .ok_or(ImageError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_zero_width() {
        let err = Image::from_raw(0, 4, Channels::Gray, vec![]).unwrap_err();
        assert_eq!(err, ImageError::InvalidDimensions { width: 0, height: 4 });
    }

    #[test]
    fn test_from_raw_rejects_zero_height() {
        let err = Image::from_raw(3, 0, Channels::Rgb, vec![]).unwrap_err();
        assert_eq!(err, ImageError::InvalidDimensions { width: 3, height: 0 });
    }

    #[test]
    fn test_from_raw_rejects_short_buffer() {
        let err = Image::from_raw(2, 2, Channels::Rgb, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            ImageError::BufferLength {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_from_samples_rejects_out_of_range() {
        let err = Image::from_samples(2, 1, Channels::Gray, &[12, 256]).unwrap_err();
        assert_eq!(
            err,
            ImageError::InvalidChannelData {
                index: 1,
                value: 256
            }
        );
    }

    #[test]
    fn test_from_samples_rejects_negative() {
        let err = Image::from_samples(1, 1, Channels::Gray, &[-1]).unwrap_err();
        assert_eq!(err, ImageError::InvalidChannelData { index: 0, value: -1 });
    }

    #[test]
    fn test_from_samples_accepts_bounds() {
        let img = Image::from_samples(2, 1, Channels::Gray, &[0, 255]).unwrap();
        assert_eq!(img.data(), &[0, 255]);
    }

    #[test]
    fn test_pixel_indexing_rgb() {
        // 2x2 RGB, each pixel tagged with its row-major index
        let img = Image::from_fn(2, 2, Channels::Rgb, |x, y, c| {
            ((y * 2 + x) * 10) as u8 + c as u8
        })
        .unwrap();
        assert_eq!(img.pixel(0, 0), Some(&[0, 1, 2][..]));
        assert_eq!(img.pixel(1, 0), Some(&[10, 11, 12][..]));
        assert_eq!(img.pixel(0, 1), Some(&[20, 21, 22][..]));
        assert_eq!(img.pixel(1, 1), Some(&[30, 31, 32][..]));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_require_reports_mismatch() {
        let img = Image::from_raw(1, 1, Channels::Gray, vec![7]).unwrap();
        assert!(img.require(Channels::Gray).is_ok());
        assert_eq!(
            img.require(Channels::Rgb),
            Err(ImageError::ChannelMismatch {
                expected: Channels::Rgb,
                actual: Channels::Gray
            })
        );
    }

    #[test]
    fn test_channel_error_display() {
        let err = ImageError::ChannelMismatch {
            expected: Channels::Rgb,
            actual: Channels::Gray,
        };
        assert_eq!(format!("{}", err), "expected a rgb image, got gray");
    }
}
