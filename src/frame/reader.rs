//! Streaming frame reader with sync-word recovery.

use std::io::{self, Read};

use super::error::FrameError;
use super::types::{Frame, FrameKind, FrameLayout, DEFAULT_MAX_PAYLOAD, SYNC};

/// Reads frames from a byte stream (serial device, capture file, pipe).
///
/// Bytes outside a frame are skipped until the next sync word, so the
/// reader can be attached mid-stream. After a [`FrameError`] the next call
/// starts hunting for sync again.
pub struct FrameReader<R> {
    inner: R,
    layout: FrameLayout,
    max_payload: usize,
    skipped: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, layout: FrameLayout) -> Self {
        Self {
            inner,
            layout,
            max_payload: DEFAULT_MAX_PAYLOAD,
            skipped: 0,
        }
    }

    /// Reject frames declaring a payload longer than `max_payload` bytes.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Total bytes discarded while hunting for sync.
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` when the stream ends outside a frame.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if !self.find_sync()? {
            return Ok(None);
        }

        let kind = match self.layout {
            FrameLayout::Plain => None,
            FrameLayout::Tagged => {
                let mut tag = [0u8; 1];
                self.fill(&mut tag)?;
                Some(FrameKind::from(tag[0]))
            }
        };

        let mut len_bytes = [0u8; 4];
        self.fill(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > self.max_payload {
            return Err(FrameError::Oversized {
                len,
                max: self.max_payload,
            });
        }

        let mut payload = vec![0u8; len];
        self.fill(&mut payload)?;

        log::trace!("frame: kind={:?} len={}", kind, len);
        Ok(Some(Frame { kind, payload }))
    }

    /// Consume bytes up to and including the next sync word.
    /// Returns `false` if the stream ends first.
    fn find_sync(&mut self) -> Result<bool, FrameError> {
        // Whether the previous byte was SYNC[0]
        let mut armed = false;
        loop {
            let Some(byte) = self.read_byte()? else {
                self.skipped += u64::from(armed);
                return Ok(false);
            };

            armed = match (armed, byte) {
                (true, b) if b == SYNC[1] => return Ok(true),
                // AA AA: drop the first, the second may still open a frame
                (true, b) if b == SYNC[0] => {
                    self.skipped += 1;
                    true
                }
                (true, _) => {
                    self.skipped += 2;
                    false
                }
                (false, b) if b == SYNC[0] => true,
                (false, _) => {
                    self.skipped += 1;
                    false
                }
            };
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Fill `buf` completely or report how much arrived before the stream ended.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), FrameError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(FrameError::Truncated {
                        expected: buf.len(),
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
