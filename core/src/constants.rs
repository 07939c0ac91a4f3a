//! Tunable defaults shared by the pipeline and the CLI.

use std::time::Duration;

/// Raw bytes per block when the caller does not choose one (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Largest block size a frame `length` field can describe.
pub const MAX_BLOCK_SIZE: usize = i32::MAX as usize;

/// Bytes the memory gate must be able to reserve before admitting one more block (20 MiB).
pub const DEFAULT_MEMORY_RESERVATION: u64 = 20 * 1024 * 1024;

/// Pause between two memory probes while the gate is stalled.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Threads kept aside for the reader (driver) and the single writer.
pub const RESERVED_IO_THREADS: usize = 2;

/// Default gzip level (balanced).
pub const DEFAULT_LEVEL_GZIP: u32 = 6;
