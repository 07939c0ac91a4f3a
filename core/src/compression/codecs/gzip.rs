//! Gzip via flate2, one complete gzip member per block.

use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::compression::types::{ByteCodec, CompressionError};
use crate::constants::DEFAULT_LEVEL_GZIP;

const CODEC_NAME: &str = "gzip";

#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
    level: Compression,
}

impl GzipCodec {
    /// `level` follows zlib: 0 = store, 9 = best.
    pub fn new(level: u32) -> Result<Self, CompressionError> {
        if level > 9 {
            return Err(CompressionError::InvalidLevel { level });
        }
        Ok(Self { level: Compression::new(level) })
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self { level: Compression::new(DEFAULT_LEVEL_GZIP) }
    }
}

fn process_failed(e: std::io::Error) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: CODEC_NAME, msg: e.to_string() }
}

impl ByteCodec for GzipCodec {
    fn name(&self) -> &'static str {
        CODEC_NAME
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // Encode this block as its own gzip member
        let mut enc = GzEncoder::new(Vec::with_capacity(input.len() / 2 + 64), self.level);
        enc.write_all(input).map_err(process_failed)?;
        enc.finish().map_err(process_failed)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut dec = GzDecoder::new(input);
        let mut out = Vec::with_capacity(input.len().saturating_mul(2));
        dec.read_to_end(&mut out).map_err(process_failed)?;
        Ok(out)
    }
}
