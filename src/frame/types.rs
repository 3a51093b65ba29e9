//! Frame types and wire constants.

use std::fmt;

/// Two-byte marker opening every frame.
pub const SYNC: [u8; 2] = [0xAA, 0x55];

/// Largest payload accepted by default (4 MiB). A 96x96 JPEG is a few KiB;
/// anything near this limit is almost certainly a corrupted length field.
pub const DEFAULT_MAX_PAYLOAD: usize = 4 * 1024 * 1024;

/// Header layout used by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLayout {
    /// `AA 55 <len:u32le> <payload>`
    #[default]
    Plain,
    /// `AA 55 <kind:u8> <len:u32le> <payload>`
    Tagged,
}

/// Image-type tag carried by tagged frames.
///
/// The board sends one frame of each kind per capture, always starting
/// with [`FrameKind::Original`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Original,
    Downsampled,
    Upsampled,
    Unknown(u8),
}

impl FrameKind {
    /// Name used for saved files, e.g. `original_001.jpg`.
    pub fn name(&self) -> String {
        match self {
            FrameKind::Original => "original".to_string(),
            FrameKind::Downsampled => "downsampled".to_string(),
            FrameKind::Upsampled => "upsampled".to_string(),
            FrameKind::Unknown(tag) => format!("unknown_{}", tag),
        }
    }
}

impl From<u8> for FrameKind {
    fn from(tag: u8) -> Self {
        match tag {
            0 => FrameKind::Original,
            1 => FrameKind::Downsampled,
            2 => FrameKind::Upsampled,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::Original => 0,
            FrameKind::Downsampled => 1,
            FrameKind::Upsampled => 2,
            FrameKind::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Image-type tag; `None` for plain frames
    pub kind: Option<FrameKind>,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl Frame {
    /// Untagged frame.
    pub fn plain(payload: Vec<u8>) -> Self {
        Self {
            kind: None,
            payload,
        }
    }

    /// Tagged frame.
    pub fn tagged(kind: FrameKind, payload: Vec<u8>) -> Self {
        Self {
            kind: Some(kind),
            payload,
        }
    }

    /// Layout this frame serializes to.
    pub fn layout(&self) -> FrameLayout {
        if self.kind.is_some() {
            FrameLayout::Tagged
        } else {
            FrameLayout::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(FrameKind::from(0), FrameKind::Original);
        assert_eq!(FrameKind::from(1), FrameKind::Downsampled);
        assert_eq!(FrameKind::from(2), FrameKind::Upsampled);
        assert_eq!(FrameKind::from(9), FrameKind::Unknown(9));
        assert_eq!(u8::from(FrameKind::Unknown(9)), 9);
        assert_eq!(u8::from(FrameKind::Upsampled), 2);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FrameKind::Original.name(), "original");
        assert_eq!(FrameKind::Unknown(7).to_string(), "unknown_7");
    }

    #[test]
    fn test_frame_layout() {
        assert_eq!(Frame::plain(vec![]).layout(), FrameLayout::Plain);
        assert_eq!(
            Frame::tagged(FrameKind::Original, vec![]).layout(),
            FrameLayout::Tagged
        );
    }
}
