//! Length-prefixed framing used on the camera's serial link.
//!
//! Each frame starts with the sync word `0xAA 0x55`, optionally followed by
//! a one-byte image-type tag, then a 4-byte little-endian payload length and
//! the payload itself (raw pixels or a compressed image).
//!
//! - [`FrameReader`] - resynchronizing reader over any byte stream
//! - [`encode`] / [`write_frame`] - serialize frames for retransmission
//! - [`FrameError`] - truncated, oversized and I/O failures

mod error;
mod reader;
mod types;
mod writer;

pub use error::FrameError;
pub use reader::FrameReader;
pub use types::{Frame, FrameKind, FrameLayout, DEFAULT_MAX_PAYLOAD, SYNC};
pub use writer::{encode, write_frame};
