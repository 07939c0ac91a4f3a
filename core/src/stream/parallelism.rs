use crate::constants::RESERVED_IO_THREADS;
use crate::types::StreamError;

/// Number of transform workers for one run.
///
/// The writer stage always runs on exactly one thread and is not counted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    worker_count: usize,
}

impl ParallelismProfile {
    /// All cores minus the ones kept for reading and writing, at least one.
    pub fn dynamic() -> Self {
        let cores = num_cpus::get();
        Self { worker_count: cores.saturating_sub(RESERVED_IO_THREADS).max(1) }
    }

    pub fn fixed(worker_count: usize) -> Result<Self, StreamError> {
        if worker_count == 0 {
            return Err(StreamError::InvalidArgument("worker count must be greater than zero".into()));
        }
        Ok(Self { worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic()
    }
}
