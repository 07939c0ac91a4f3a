//! Normalized I/O and the two block readers.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use log::{debug, trace};

use crate::constants::MAX_BLOCK_SIZE;
use crate::stream::block::Block;
use crate::stream::framing::{read_frame_header, FrameError};
use crate::types::StreamError;

const FRAME_PREALLOC_LIMIT: usize = 16 * 1024 * 1024;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Captured into the given buffer; keep a clone to read it back.
    Memory(SharedBufferWriter),
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(File::open(p)?),
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, StreamError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(BufWriter::new(File::create(p)?)),
        OutputSink::Memory(buf) => Box::new(buf),
    };
    Ok(writer)
}

/// `Write` into a `Vec<u8>` that stays reachable after the writer moved to
/// another thread.
#[derive(Debug, Clone, Default)]
pub struct SharedBufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read until `len` bytes are buffered or the source is exhausted.
///
/// Short reads are retried, so only the final chunk of a stream can be
/// shorter than `len`.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Bytes, StreamError> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}

pub fn validate_block_size(block_size: usize) -> Result<(), StreamError> {
    if block_size == 0 || block_size > MAX_BLOCK_SIZE {
        return Err(StreamError::InvalidArgument(format!(
            "block size must be between 1 and {MAX_BLOCK_SIZE} bytes, got {block_size}"
        )));
    }
    Ok(())
}

/// Cuts a raw stream into fixed-size blocks numbered 0, 1, 2, ...
///
/// The sequence is fused: it ends after the first empty read or the first error.
pub struct SlicingReader<R> {
    inner: R,
    block_size: usize,
    next_position: u32,
    done: bool,
}

impl<R: Read> SlicingReader<R> {
    pub fn new(inner: R, block_size: usize) -> Result<Self, StreamError> {
        validate_block_size(block_size)?;
        Ok(Self { inner, block_size, next_position: 0, done: false })
    }

    fn next_block(&mut self) -> Result<Option<Block>, StreamError> {
        let payload = read_exact_or_eof(&mut self.inner, self.block_size)?;
        if payload.is_empty() {
            debug!("slicing reader exhausted after {} blocks", self.next_position);
            return Ok(None);
        }

        let position = self.next_position;
        self.next_position = position
            .checked_add(1)
            .ok_or(FrameError::PositionOutOfRange(position))?;
        trace!("read block {} ({} bytes)", position, payload.len());
        Ok(Some(Block::new(position, payload)))
    }
}

impl<R: Read> Iterator for SlicingReader<R> {
    type Item = Result<Block, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_block().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Parses `position ‖ length ‖ payload` frames back into blocks.
///
/// Blocks come out in physical order, which need not be position order.
pub struct FrameReader<R> {
    inner: R,
    frames_read: u64,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, frames_read: 0, done: false }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn next_block(&mut self) -> Result<Option<Block>, StreamError> {
        let Some(header) = read_frame_header(&mut self.inner)? else {
            debug!("frame reader reached end of stream after {} frames", self.frames_read);
            return Ok(None);
        };
        if header.is_terminal() {
            debug!("terminal frame header after {} frames", self.frames_read);
            return Ok(None);
        }

        let position = u32::try_from(header.position)
            .map_err(|_| FrameError::NegativePosition(header.position))?;
        let expected = header.length as usize;
        // capped: a corrupt length must not reserve gigabytes up front
        let mut payload = Vec::with_capacity(expected.min(FRAME_PREALLOC_LIMIT));
        (&mut self.inner).take(expected as u64).read_to_end(&mut payload)?;
        if payload.len() != expected {
            return Err(FrameError::Truncated {
                position: header.position,
                expected,
                actual: payload.len(),
            }
            .into());
        }

        self.frames_read += 1;
        trace!("read frame {} ({} bytes)", position, expected);
        Ok(Some(Block::new(position, payload)))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Block, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_block().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
