//! Nearest-neighbor resampling by a rational scale factor.

use std::fmt;
use std::str::FromStr;

use crate::image::{Image, ImageError};

/// Largest output accepted by [`resample_by`], in samples (256 Mi).
/// Far beyond any camera frame; bigger requests are treated as a bad factor.
pub const MAX_OUTPUT_SAMPLES: usize = 1 << 28;

/// A positive rational magnification `num / den`.
///
/// `3/2` enlarges by 1.5, `2/3` shrinks to two thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaleFactor {
    num: u32,
    den: u32,
}

impl ScaleFactor {
    /// Enlarge by 1.5, the board's upsampling setting.
    pub const UP_3_2: ScaleFactor = ScaleFactor { num: 3, den: 2 };
    /// Shrink to two thirds, the board's downsampling setting.
    pub const DOWN_2_3: ScaleFactor = ScaleFactor { num: 2, den: 3 };

    /// Validate a scale factor; both terms must be positive and fit in `u32`.
    pub fn new(num: i64, den: i64) -> Result<Self, ImageError> {
        match (u32::try_from(num), u32::try_from(den)) {
            (Ok(n), Ok(d)) if n > 0 && d > 0 => Ok(Self { num: n, den: d }),
            _ => Err(ImageError::InvalidScale { num, den }),
        }
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn den(&self) -> u32 {
        self.den
    }

    /// Output length for an input side of `len` pixels: `floor(len * num / den)`.
    pub fn output_len(&self, len: u32) -> u64 {
        u64::from(len) * u64::from(self.num) / u64::from(self.den)
    }

    /// Source coordinate for output coordinate `out` along a side of `len`
    /// input pixels: `floor(out * den / num)`, clamped to `len - 1`.
    ///
    /// The clamp matters on the last row/column when `num` does not divide
    /// `den * out` evenly.
    pub fn source_index(&self, out: u32, len: u32) -> u32 {
        let src = u64::from(out) * u64::from(self.den) / u64::from(self.num);
        if src >= u64::from(len) {
            len.saturating_sub(1)
        } else {
            src as u32
        }
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for ScaleFactor {
    type Err = String;

    /// Parse `NUM/DEN` or a bare integer `N` (meaning `N/1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let num: i64 = num
            .parse()
            .map_err(|_| format!("Invalid numerator '{}' in scale '{}'", num, s))?;
        let den: i64 = den
            .parse()
            .map_err(|_| format!("Invalid denominator '{}' in scale '{}'", den, s))?;
        ScaleFactor::new(num, den).map_err(|e| e.to_string())
    }
}

/// Resize an image by `scale_num / scale_den`.
///
/// Convenience wrapper validating the factor before calling [`resample_by`].
pub fn resample(image: &Image, scale_num: i64, scale_den: i64) -> Result<Image, ImageError> {
    resample_by(image, ScaleFactor::new(scale_num, scale_den)?)
}

/// Resize an image with nearest-neighbor inverse mapping.
///
/// Output sides are `floor(side * num / den)`. Every output pixel copies all
/// channels of source pixel `(floor(x * den / num), floor(y * den / num))`,
/// clamped to the source bounds. No interpolation, no floating point.
///
/// A factor that shrinks either side to zero, or grows the output past
/// [`MAX_OUTPUT_SAMPLES`] or past what can be allocated, is rejected with
/// [`ImageError::InvalidScale`].
pub fn resample_by(image: &Image, scale: ScaleFactor) -> Result<Image, ImageError> {
    let invalid = || ImageError::InvalidScale {
        num: i64::from(scale.num),
        den: i64::from(scale.den),
    };

    let in_w = image.width();
    let in_h = image.height();
    let out_w = u32::try_from(scale.output_len(in_w)).map_err(|_| invalid())?;
    let out_h = u32::try_from(scale.output_len(in_h)).map_err(|_| invalid())?;
    if out_w == 0 || out_h == 0 {
        return Err(invalid());
    }

    let bpp = image.channels().count();
    let samples = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|pixels| pixels.checked_mul(bpp))
        .filter(|&n| n <= MAX_OUTPUT_SAMPLES)
        .ok_or_else(invalid)?;

    let mut data: Vec<u8> = Vec::new();
    data.try_reserve_exact(samples).map_err(|_| invalid())?;
    let mut src_cols: Vec<usize> = Vec::new();
    src_cols.try_reserve_exact(out_w as usize).map_err(|_| invalid())?;

    // Column mapping is the same for every row
    src_cols.extend((0..out_w).map(|x| scale.source_index(x, in_w) as usize));

    let src = image.data();
    let row_stride = in_w as usize * bpp;

    for y in 0..out_h {
        let row_start = scale.source_index(y, in_h) as usize * row_stride;
        for &sx in &src_cols {
            let start = row_start + sx * bpp;
            data.extend_from_slice(&src[start..start + bpp]);
        }
    }

    log::trace!(
        "resample {}x{} by {} -> {}x{}",
        in_w,
        in_h,
        scale,
        out_w,
        out_h
    );

    Image::from_raw(out_w, out_h, image.channels(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Channels;

    fn gray(values: &[u8], width: u32, height: u32) -> Image {
        Image::from_raw(width, height, Channels::Gray, values.to_vec()).unwrap()
    }

    #[test]
    fn test_scale_factor_rejects_non_positive() {
        assert!(ScaleFactor::new(0, 1).is_err());
        assert!(ScaleFactor::new(1, 0).is_err());
        assert!(ScaleFactor::new(-3, 2).is_err());
        assert!(ScaleFactor::new(3, -2).is_err());
        assert_eq!(
            ScaleFactor::new(-3, 2),
            Err(ImageError::InvalidScale { num: -3, den: 2 })
        );
    }

    #[test]
    fn test_scale_factor_parse() {
        let s: ScaleFactor = "3/2".parse().unwrap();
        assert_eq!((s.num(), s.den()), (3, 2));
        let s: ScaleFactor = " 2 / 3 ".parse().unwrap();
        assert_eq!((s.num(), s.den()), (2, 3));
        let s: ScaleFactor = "4".parse().unwrap();
        assert_eq!((s.num(), s.den()), (4, 1));
        assert_eq!(s.to_string(), "4/1");
    }

    #[test]
    fn test_scale_factor_parse_errors() {
        assert!("".parse::<ScaleFactor>().is_err());
        assert!("a/2".parse::<ScaleFactor>().is_err());
        assert!("3/b".parse::<ScaleFactor>().is_err());
        assert!("3/0".parse::<ScaleFactor>().is_err());
        assert!("1.5".parse::<ScaleFactor>().is_err());
    }

    #[test]
    fn test_source_index_clamps() {
        // 3/2 on a side of 2: outputs 0,1,2 map to 0,0,1
        let s = ScaleFactor::new(3, 2).unwrap();
        assert_eq!(s.source_index(0, 2), 0);
        assert_eq!(s.source_index(1, 2), 0);
        assert_eq!(s.source_index(2, 2), 1);
        // 1/3 maps output 1 to source 3, past a side of 3
        let s = ScaleFactor::new(1, 3).unwrap();
        assert_eq!(s.source_index(1, 3), 2);
    }

    #[test]
    fn test_output_len_truncates() {
        let s = ScaleFactor::new(2, 3).unwrap();
        assert_eq!(s.output_len(96), 64);
        assert_eq!(s.output_len(5), 3);
        assert_eq!(s.output_len(1), 0);
    }

    #[test]
    fn test_resample_upscale_2x2_by_3_2() {
        let img = gray(&[1, 2, 3, 4], 2, 2);
        let out = resample(&img, 3, 2).unwrap();
        assert_eq!((out.width(), out.height()), (3, 3));
        assert_eq!(out.data(), &[1, 1, 2, 1, 1, 2, 3, 3, 4]);
    }

    #[test]
    fn test_resample_downscale_by_2_3() {
        let img = gray(&[0, 1, 2, 3, 4, 5, 6, 7, 8], 3, 3);
        let out = resample(&img, 2, 3).unwrap();
        // Output 2x2, sources floor(0*3/2)=0 and floor(1*3/2)=1
        assert_eq!(out.data(), &[0, 1, 3, 4]);
    }

    #[test]
    fn test_resample_collapse_is_invalid_scale() {
        let img = gray(&[9, 9], 2, 1);
        assert_eq!(
            resample(&img, 1, 2),
            Err(ImageError::InvalidScale { num: 1, den: 2 })
        );
    }

    #[test]
    fn test_resample_copies_every_channel() {
        let img = Image::from_raw(1, 1, Channels::Rgb, vec![10, 20, 30]).unwrap();
        let out = resample(&img, 2, 1).unwrap();
        assert_eq!(out.channels(), Channels::Rgb);
        assert_eq!(out.data(), &[10, 20, 30, 10, 20, 30, 10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn test_resample_overflowing_size_is_invalid_scale() {
        let img = gray(&[1, 2], 2, 1);
        assert!(matches!(
            resample(&img, i64::from(u32::MAX), 1),
            Err(ImageError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_resample_huge_in_range_factor_is_invalid_scale() {
        // Both sides fit in u32 but the buffer could never be allocated
        let img = gray(&[1, 2, 3, 4], 2, 2);
        assert_eq!(
            resample(&img, i64::from(u32::MAX / 2), 1),
            Err(ImageError::InvalidScale {
                num: i64::from(u32::MAX / 2),
                den: 1
            })
        );
    }

    #[test]
    fn test_resample_output_cap() {
        // 16384^2 samples sits exactly on the cap, one more per side exceeds it
        let img = gray(&[7], 1, 1);
        assert!(matches!(
            resample(&img, 16385, 1),
            Err(ImageError::InvalidScale { num: 16385, den: 1 })
        ));
        let rgb = Image::from_raw(1, 1, Channels::Rgb, vec![1, 2, 3]).unwrap();
        assert!(matches!(
            resample(&rgb, 10000, 1),
            Err(ImageError::InvalidScale { .. })
        ));
        let out = resample(&img, 64, 1).unwrap();
        assert_eq!(out.data().len(), 64 * 64);
    }
}
