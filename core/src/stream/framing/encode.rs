use std::io::Write;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::stream::block::Block;
use crate::stream::framing::types::{FrameError, FrameHeader};
use crate::types::StreamError;

/// Big-endian encoding regardless of host byte order.
#[inline]
pub fn encode_i32_be(value: i32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_i32(&mut buf, value);
    buf
}

/// Header describing `block` as it would be framed.
pub fn frame_header(block: &Block) -> Result<FrameHeader, FrameError> {
    let position = i32::try_from(block.position())
        .map_err(|_| FrameError::PositionOutOfRange(block.position()))?;
    let length = i32::try_from(block.len())
        .map_err(|_| FrameError::PayloadTooLarge(block.len()))?;
    Ok(FrameHeader { position, length })
}

/// Encode a block into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ position (4, i32 BE) ]
/// [ length   (4, i32 BE) ]
/// [ payload  (length)    ]
/// ```
pub fn encode_frame(block: &Block) -> Result<Vec<u8>, FrameError> {
    let header = frame_header(block)?;
    let mut out = Vec::with_capacity(FrameHeader::LEN + block.len());

    out.extend_from_slice(&encode_i32_be(header.position));
    out.extend_from_slice(&encode_i32_be(header.length));
    out.extend_from_slice(block.payload());

    debug_assert_eq!(out.len(), FrameHeader::LEN + block.len());
    Ok(out)
}

/// Stream a frame straight into `w` without building an intermediate buffer.
pub fn write_frame<W: Write + ?Sized>(w: &mut W, block: &Block) -> Result<usize, StreamError> {
    let header = frame_header(block)?;
    w.write_i32::<BigEndian>(header.position)?;
    w.write_i32::<BigEndian>(header.length)?;
    w.write_all(block.payload())?;
    Ok(FrameHeader::LEN + block.len())
}
