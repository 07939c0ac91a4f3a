use thiserror::Error;

/// Fixed-size frame header.
///
/// Both fields are big-endian signed 32-bit integers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Ordinal of the block in the original uncompressed stream.
    pub position: i32,
    /// Byte count of the payload following the header.
    pub length: i32,
}

impl FrameHeader {
    pub const LEN: usize = 4 // position
        + 4;                 // length

    /// A non-positive length marks the end of the frame sequence.
    pub fn is_terminal(&self) -> bool {
        self.length <= 0
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("block position {0} does not fit a frame header")]
    PositionOutOfRange(u32),

    #[error("payload of {0} bytes does not fit a frame header")]
    PayloadTooLarge(usize),

    #[error("negative block position {0} in frame header")]
    NegativePosition(i32),

    #[error("truncated frame at position {position}: expected {expected} payload bytes, got {actual}")]
    Truncated {
        position: i32,
        expected: usize,
        actual: usize,
    },
}
