//! Integer-only image processing stages.
//!
//! These mirror the fixed-point routines that run on the camera board, so
//! every intermediate value is an integer and every division truncates:
//!
//! 1. **Grayscale reduction** - RGB to intensity with 30/59/11 weights
//! 2. **Histogram thresholding** - keep at most N bright pixels
//! 3. **Rational resampling** - nearest-neighbor resize by `num/den`
//!
//! All stages are pure: they borrow their input, allocate exactly one
//! output buffer and touch no shared state, so independent images can be
//! processed from any number of threads.

mod grayscale;
mod resample;
mod threshold;

pub use grayscale::{reduce, BLUE_WEIGHT, GREEN_WEIGHT, RED_WEIGHT, WEIGHT_SCALE};
pub use resample::{resample, resample_by, ScaleFactor, MAX_OUTPUT_SAMPLES};
pub use threshold::{histogram, threshold, Histogram, Thresholded, BRIGHT, DARK};
