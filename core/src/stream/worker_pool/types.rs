use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Error type a worker action may return.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Per-item work run outside the pool mutex.
pub type Action<T> = Arc<dyn Fn(T) -> Result<(), ActionError> + Send + Sync>;

/// "May this head item be dequeued now?"
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// What travels through a pool queue.
///
/// `Poison` orders after every `Work` item: a priority queue only surfaces it
/// once no genuine work is left ahead of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolMessage<T> {
    Work(T),
    /// Terminates the worker that dequeues it.
    Poison,
}

/// How the single failure slot treats concurrent failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Each failing worker overwrites the slot; the last one is reported.
    #[default]
    LastWins,
    /// The first recorded failure is kept, later ones are only logged.
    FirstWins,
}

#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Thread name prefix, also used in log lines.
    pub name: String,
    pub failure_policy: FailurePolicy,
}

impl PoolOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            name: "worker".into(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkerPoolError {
    #[error("worker count must be greater than zero")]
    InvalidWorkerCount,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("worker pool has been shut down")]
    ShutDown,

    /// Aggregate wrapper around the failure captured from a worker action.
    #[error("worker action failed: {source}")]
    Failed { source: ActionError },

    #[error("worker panicked: {0}")]
    Panicked(String),

    /// Shutdown was requested but the head of the queue can never become eligible.
    #[error("worker pool stalled: {pending} queued items can never become eligible")]
    Stalled { pending: usize },
}
