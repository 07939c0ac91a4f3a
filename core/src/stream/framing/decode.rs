use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::stream::framing::types::FrameHeader;

/// Decode a big-endian `i32` from the first four bytes of `bytes`.
///
/// Fewer than four bytes yields `None`; this is how end of stream is detected,
/// never an error.
#[inline]
pub fn decode_i32_be(bytes: &[u8]) -> Option<i32> {
    if bytes.len() < 4 {
        return None;
    }
    Some(BigEndian::read_i32(&bytes[..4]))
}

/// Read up to four bytes and decode them.
///
/// Returns the value together with how many bytes were consumed, so a caller
/// can tell a clean end of stream (0) from a partial trailing header.
fn read_i32_be_counted<R: Read + ?Sized>(r: &mut R) -> io::Result<(Option<i32>, usize)> {
    let mut buf = [0u8; 4];
    let mut off = 0;

    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok((decode_i32_be(&buf[..off]), off))
}

/// Read one big-endian `i32`; `None` when fewer than four bytes remain.
pub fn read_i32_be<R: Read + ?Sized>(r: &mut R) -> io::Result<Option<i32>> {
    read_i32_be_counted(r).map(|(value, _)| value)
}

/// Parse a header from an in-memory buffer.
#[inline]
pub fn decode_frame_header(wire: &[u8]) -> Option<FrameHeader> {
    let position = decode_i32_be(wire)?;
    let length = decode_i32_be(wire.get(4..)?)?;
    Some(FrameHeader { position, length })
}

/// Read the next frame header from a stream.
///
/// `Ok(None)` means the stream ended: either nothing was left, or the
/// remaining bytes could not form a full header.
pub fn read_frame_header<R: Read + ?Sized>(r: &mut R) -> io::Result<Option<FrameHeader>> {
    let (position, consumed) = read_i32_be_counted(r)?;
    let Some(position) = position else {
        if consumed > 0 {
            log::warn!("ignoring {consumed} trailing bytes after the last frame");
        }
        return Ok(None);
    };

    let (length, consumed) = read_i32_be_counted(r)?;
    let Some(length) = length else {
        log::warn!(
            "ignoring partial frame header at position {position} ({} of {} bytes)",
            4 + consumed,
            FrameHeader::LEN
        );
        return Ok(None);
    };

    Ok(Some(FrameHeader { position, length }))
}
