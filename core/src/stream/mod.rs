//! Concurrent block pipeline.
//!
//! Data flow for one run:
//!
//! ```text
//! reader (calling thread)
//!   -> memory gate -> transform pool (N workers, FIFO)
//!   -> memory gate -> writer pool (1 worker, FIFO or priority + write gate)
//!   -> destination
//! ```

pub mod block;
pub mod core;
pub mod framing;
pub mod io;
pub mod memory_gate;
pub mod parallelism;
pub mod pipeline;
pub mod queue;
pub mod worker_pool;

pub use block::Block;
pub use self::core::{compress_bytes, compress_stream, decompress_bytes, decompress_stream};
pub use io::{FrameReader, InputSource, OutputSink, SharedBufferWriter, SlicingReader};
pub use memory_gate::{MemoryGate, MemoryGateConfig, MemoryProbe, SystemMemoryProbe, UnboundedProbe};
pub use parallelism::ParallelismProfile;
pub use pipeline::{build_writer_pool, run_pipeline, Direction, PipelineConfig, StageConfig};
