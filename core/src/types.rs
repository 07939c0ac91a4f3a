use std::io;

use thiserror::Error;

use crate::{
    compression::CompressionError,
    stream::{framing::FrameError, worker_pool::WorkerPoolError},
};

/// Unified stream error covering I/O, framing, compression, worker pools and memory pressure.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Messages are stable so the CLI can print them verbatim.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error(transparent)]
    WorkerPool(#[from] WorkerPoolError),

    /// The memory gate can never satisfy its reservation on this host.
    #[error("not enough memory: reservation of {requested} bytes exceeds capacity of {capacity} bytes")]
    MemoryExhausted { requested: u64, capacity: u64 },

    /// Usage error: a caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StreamError {
    /// Innermost message worth showing to a user.
    ///
    /// Worker failures are reported through their captured cause rather than the
    /// aggregate wrapper.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::WorkerPool(WorkerPoolError::Failed { source }) => {
                match source.downcast_ref::<StreamError>() {
                    Some(inner) => inner.user_message(),
                    None => source.to_string(),
                }
            }
            other => other.to_string(),
        }
    }

    /// Underlying I/O error, looking through worker failures.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::WorkerPool(WorkerPoolError::Failed { source }) => {
                if let Some(inner) = source.downcast_ref::<StreamError>() {
                    inner.io_error()
                } else {
                    source.downcast_ref::<io::Error>()
                }
            }
            _ => None,
        }
    }
}
