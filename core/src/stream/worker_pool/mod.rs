//! Fixed-size thread pools draining a shared ordering queue.
//!
//! Responsibilities:
//! - Spawn `worker_count` identical worker threads
//! - Gate dequeues on an eligibility predicate (strict output ordering)
//! - Capture action failures and panics, surface them on shutdown
//! - Poison-based shutdown, exactly one poison per worker
//!
//! Non-responsibilities:
//! - Compression
//! - Framing
//! - Memory pressure

pub mod types;
pub mod pool;

pub use types::{
    Action,
    ActionError,
    FailurePolicy,
    PoolMessage,
    PoolOptions,
    Predicate,
    WorkerPoolError,
};
pub use pool::{PoolSubmitter, WorkerPool};
