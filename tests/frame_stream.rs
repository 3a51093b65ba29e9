//! Integration tests for the serial framing codec.

use std::io::{Cursor, Read};

use camlab::frame::*;

/// Reader that hands out at most one byte per call, like a slow serial port.
struct Trickle<R>(R);

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(1);
        self.0.read(&mut buf[..len])
    }
}

fn stream(frames: &[Frame]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for frame in frames {
        write_frame(&mut bytes, frame).unwrap();
    }
    bytes
}

#[test]
fn test_plain_stream_in_order() {
    let frames = vec![
        Frame::plain(vec![1, 2, 3]),
        Frame::plain(vec![]),
        Frame::plain(vec![0xAA, 0x55, 0xAA]),
    ];
    let reader = FrameReader::new(Cursor::new(stream(&frames)), FrameLayout::Plain);
    let read: Vec<Frame> = reader.map(|f| f.unwrap()).collect();
    assert_eq!(read, frames);
}

#[test]
fn test_tagged_stream_one_byte_at_a_time() {
    let frames = vec![
        Frame::tagged(FrameKind::Original, vec![9; 40]),
        Frame::tagged(FrameKind::Downsampled, vec![8; 20]),
        Frame::tagged(FrameKind::Upsampled, vec![7; 60]),
    ];
    let mut reader = FrameReader::new(Trickle(Cursor::new(stream(&frames))), FrameLayout::Tagged);
    for expected in &frames {
        assert_eq!(reader.next_frame().unwrap().as_ref(), Some(expected));
    }
    assert!(reader.next_frame().unwrap().is_none());
    assert_eq!(reader.skipped_bytes(), 0);
}

#[test]
fn test_boot_noise_before_first_frame() {
    let mut bytes = b"rst:0x1 (POWERON_RESET)\r\n".to_vec();
    let noise_len = bytes.len() as u64;
    bytes.extend(encode(&Frame::plain(vec![5, 6])).unwrap());

    let mut reader = FrameReader::new(Cursor::new(bytes), FrameLayout::Plain);
    assert_eq!(reader.next_frame().unwrap(), Some(Frame::plain(vec![5, 6])));
    assert_eq!(reader.skipped_bytes(), noise_len);
}

#[test]
fn test_cut_off_frame_reports_truncation() {
    let mut bytes = stream(&[Frame::plain(vec![1; 8])]);
    bytes.extend(&encode(&Frame::plain(vec![2; 100])).unwrap()[..50]);

    let mut reader = FrameReader::new(Cursor::new(bytes), FrameLayout::Plain);
    assert_eq!(reader.next_frame().unwrap(), Some(Frame::plain(vec![1; 8])));
    match reader.next_frame() {
        Err(FrameError::Truncated { expected, actual }) => {
            assert_eq!(expected, 100);
            assert_eq!(actual, 44);
        }
        other => panic!("expected truncation, got {:?}", other),
    }
    assert!(reader.next_frame().unwrap().is_none());
}

#[test]
fn test_unknown_tag_is_preserved() {
    let bytes = encode(&Frame::tagged(FrameKind::Unknown(7), vec![1])).unwrap();
    let mut reader = FrameReader::new(Cursor::new(bytes), FrameLayout::Tagged);
    let frame = reader.next_frame().unwrap().unwrap();
    assert_eq!(frame.kind, Some(FrameKind::Unknown(7)));
    assert_eq!(frame.kind.unwrap().name(), "unknown_7");
}

#[test]
fn test_error_display() {
    let err = FrameError::Truncated {
        expected: 10,
        actual: 3,
    };
    assert_eq!(err.to_string(), "incomplete frame: expected 10 bytes, got 3");
    let err = FrameError::Oversized { len: 99, max: 10 };
    assert!(err.to_string().contains("99"));
}
