//! In-memory image buffers shared by every processing stage.
//!
//! - [`Image`] - flat row-major pixel buffer with explicit geometry
//! - [`Channels`] - single-channel intensity or three-channel RGB layout
//! - [`ImageError`] - input validation failures

mod error;
mod types;

pub use error::ImageError;
pub use types::{Channels, Image};
