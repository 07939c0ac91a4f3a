//! blockzip-core
//!
//! Parallel block compression engine.
//! Splits a stream into fixed-size blocks, runs a codec on many blocks at
//! once and reassembles the results in a self-describing frame format.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod compression;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{ByteCodec, CompressionError, GzipCodec};
    pub use crate::stream::{
        compress_bytes, compress_stream, decompress_bytes, decompress_stream, InputSource,
        MemoryGateConfig, OutputSink, ParallelismProfile, PipelineConfig,
    };
    pub use crate::stream::worker_pool::FailurePolicy;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
