//! compression/types.rs
//! Codec contract and codec errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("invalid compression level {level} (expected 0..=9)")]
    InvalidLevel { level: u32 },
}

/// A codec that turns one opaque byte buffer into another.
///
/// Contract: `decompress(compress(x)) == x` for every `x`, the empty buffer included.
/// Implementations are shared by all transform workers, so they take `&self`
/// and must not keep per-call state.
pub trait ByteCodec: Send + Sync {
    /// Human-readable codec name for logs.
    fn name(&self) -> &'static str;

    /// Compress a single independent block.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Decompress a block produced by [`ByteCodec::compress`].
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
}
