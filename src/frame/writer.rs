//! Frame serialization.

use std::io::Write;

use super::error::FrameError;
use super::types::{Frame, SYNC};

/// Serialize a frame; tagged iff `frame.kind` is set.
pub fn encode(frame: &Frame) -> Result<Vec<u8>, FrameError> {
    let len = u32::try_from(frame.payload.len()).map_err(|_| FrameError::Oversized {
        len: frame.payload.len(),
        max: u32::MAX as usize,
    })?;

    let mut out = Vec::with_capacity(frame.payload.len() + 7);
    out.extend_from_slice(&SYNC);
    if let Some(kind) = frame.kind {
        out.push(u8::from(kind));
    }
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&frame.payload);
    Ok(out)
}

/// Serialize a frame straight into a writer.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), FrameError> {
    writer.write_all(&encode(frame)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameKind;

    #[test]
    fn test_encode_plain() {
        let bytes = encode(&Frame::plain(vec![7, 8, 9])).unwrap();
        assert_eq!(bytes, vec![0xAA, 0x55, 3, 0, 0, 0, 7, 8, 9]);
    }

    #[test]
    fn test_encode_tagged() {
        let bytes = encode(&Frame::tagged(FrameKind::Upsampled, vec![1])).unwrap();
        assert_eq!(bytes, vec![0xAA, 0x55, 2, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_length_is_little_endian() {
        let bytes = encode(&Frame::plain(vec![0; 0x0102])).unwrap();
        assert_eq!(&bytes[2..6], &[0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_write_frame_appends() {
        let mut sink = Vec::new();
        write_frame(&mut sink, &Frame::plain(vec![1])).unwrap();
        write_frame(&mut sink, &Frame::plain(vec![2])).unwrap();
        assert_eq!(sink.len(), 14);
        assert_eq!(sink[7..9], SYNC);
    }
}
