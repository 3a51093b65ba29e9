//! Frame codec error types

use thiserror::Error;

/// Errors produced while reading or writing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Stream ended inside a frame header or payload
    #[error("incomplete frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    /// Declared payload length exceeds the configured limit
    #[error("frame payload of {len} bytes exceeds the {max} byte limit")]
    Oversized { len: usize, max: usize },
    /// Underlying stream failed
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}
