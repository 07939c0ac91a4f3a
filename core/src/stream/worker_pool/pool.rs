use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, error, trace, warn};

use crate::stream::queue::OrderingQueue;
use crate::stream::worker_pool::types::{
    Action, ActionError, FailurePolicy, PoolMessage, PoolOptions, Predicate, WorkerPoolError,
};

struct PoolState<T> {
    queue: Box<dyn OrderingQueue<PoolMessage<T>>>,
    terminating: bool,
    /// Items dequeued whose action has not returned yet.
    in_flight: usize,
}

struct Shared<T> {
    name: String,
    state: Mutex<PoolState<T>>,
    changed: Condvar,
    failure: Mutex<Option<WorkerPoolError>>,
    failed: AtomicBool,
    policy: FailurePolicy,
}

impl<T> Shared<T> {
    fn lock_state(&self) -> MutexGuard<'_, PoolState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, PoolState<T>>) -> MutexGuard<'a, PoolState<T>> {
        self.changed.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self, err: WorkerPoolError) {
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        match (self.policy, slot.as_ref()) {
            (FailurePolicy::FirstWins, Some(kept)) => {
                warn!("[{}] dropping failure `{}`, keeping `{}`", self.name, err, kept);
            }
            _ => {
                error!("[{}] {}", self.name, err);
                *slot = Some(err);
            }
        }
        self.failed.store(true, Ordering::Release);
    }

    fn take_failure(&self) -> Option<WorkerPoolError> {
        self.failure.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Clonable handle that can feed a pool from another thread, typically
/// from inside the action of an upstream pool.
pub struct PoolSubmitter<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for PoolSubmitter<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T> PoolSubmitter<T> {
    /// Enqueue one work item and wake the workers.
    pub fn submit(&self, item: T) -> Result<(), WorkerPoolError> {
        {
            let mut state = self.shared.lock_state();
            if state.terminating {
                return Err(WorkerPoolError::ShutDown);
            }
            state.queue.enqueue(PoolMessage::Work(item));
        }
        self.shared.changed.notify_all();
        Ok(())
    }

    pub fn has_failed(&self) -> bool {
        self.shared.failed.load(Ordering::Acquire)
    }
}

/// A fixed set of worker threads draining one ordering queue.
///
/// A worker only dequeues the head when it is a poison message or when the
/// predicate accepts it; otherwise it sleeps until another worker finishes
/// an action or a producer submits new work.
pub struct WorkerPool<T> {
    shared: Arc<Shared<T>>,
    worker_count: usize,
    workers: Mutex<Option<Vec<JoinHandle<()>>>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Pool whose workers take any head item.
    pub fn new<A>(
        worker_count: usize,
        queue: Box<dyn OrderingQueue<PoolMessage<T>>>,
        action: A,
    ) -> Result<Self, WorkerPoolError>
    where
        A: Fn(T) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self::with_predicate(worker_count, queue, |_: &T| true, action)
    }

    pub fn with_predicate<P, A>(
        worker_count: usize,
        queue: Box<dyn OrderingQueue<PoolMessage<T>>>,
        predicate: P,
        action: A,
    ) -> Result<Self, WorkerPoolError>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        A: Fn(T) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self::spawn(PoolOptions::default(), worker_count, queue, predicate, action)
    }

    pub fn spawn<P, A>(
        options: PoolOptions,
        worker_count: usize,
        queue: Box<dyn OrderingQueue<PoolMessage<T>>>,
        predicate: P,
        action: A,
    ) -> Result<Self, WorkerPoolError>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        A: Fn(T) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        if worker_count == 0 {
            return Err(WorkerPoolError::InvalidWorkerCount);
        }

        let shared = Arc::new(Shared {
            name: options.name,
            state: Mutex::new(PoolState { queue, terminating: false, in_flight: 0 }),
            changed: Condvar::new(),
            failure: Mutex::new(None),
            failed: AtomicBool::new(false),
            policy: options.failure_policy,
        });

        let pool = Self {
            shared: Arc::clone(&shared),
            worker_count,
            workers: Mutex::new(Some(Vec::with_capacity(worker_count))),
        };

        let predicate: Predicate<T> = Arc::new(predicate);
        let action: Action<T> = Arc::new(action);

        for id in 0..worker_count {
            let shared = Arc::clone(&shared);
            let predicate = Arc::clone(&predicate);
            let action = Arc::clone(&action);
            // On spawn failure `pool` drops here and joins the workers already started.
            let handle = thread::Builder::new()
                .name(format!("{}-{}", shared.name, id))
                .spawn(move || run_worker(shared, id, predicate, action))?;
            if let Some(handles) = pool.lock_workers().as_mut() {
                handles.push(handle);
            }
        }

        debug!("[{}] started {} workers", shared.name, worker_count);
        Ok(pool)
    }
}

impl<T> WorkerPool<T> {
    pub fn submit(&self, item: T) -> Result<(), WorkerPoolError> {
        self.submitter().submit(item)
    }

    pub fn submitter(&self) -> PoolSubmitter<T> {
        PoolSubmitter { shared: Arc::clone(&self.shared) }
    }

    /// True once any worker recorded a failure. Producers poll this to stop early.
    pub fn has_failed(&self) -> bool {
        self.shared.failed.load(Ordering::Acquire)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Enqueue one poison per worker, join all of them, then report the
    /// recorded failure if any. Later calls return `Ok(())`.
    pub fn shutdown(&self) -> Result<(), WorkerPoolError> {
        let Some(handles) = self.lock_workers().take() else {
            return Ok(());
        };

        {
            let mut state = self.shared.lock_state();
            state.terminating = true;
            for _ in 0..handles.len() {
                state.queue.enqueue(PoolMessage::Poison);
            }
        }
        self.shared.changed.notify_all();

        for handle in handles {
            if handle.join().is_err() {
                // Actions run under catch_unwind, so only the loop itself can get here.
                self.shared
                    .record_failure(WorkerPoolError::Panicked("worker loop panicked".into()));
            }
        }
        debug!("[{}] all workers joined", self.shared.name);

        match self.shared.take_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lock_workers(&self) -> MutexGuard<'_, Option<Vec<JoinHandle<()>>>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("[{}] failure discarded on drop: {}", self.shared.name, err);
        }
    }
}

fn run_worker<T>(shared: Arc<Shared<T>>, id: usize, predicate: Predicate<T>, action: Action<T>) {
    trace!("[{}-{}] started", shared.name, id);
    loop {
        let item = {
            let mut state = shared.lock_state();
            loop {
                let eligible = match state.queue.peek() {
                    None => false,
                    Some(PoolMessage::Poison) => true,
                    Some(PoolMessage::Work(head)) => predicate(head),
                };
                if eligible {
                    break;
                }
                if state.terminating && state.in_flight == 0 && !state.queue.is_empty() {
                    // No running action is left that could make the head eligible.
                    let pending = state.queue.len();
                    drop(state);
                    shared.record_failure(WorkerPoolError::Stalled { pending });
                    shared.changed.notify_all();
                    return;
                }
                state = shared.wait(state);
            }

            match state.queue.try_dequeue() {
                Some(PoolMessage::Work(item)) => {
                    state.in_flight += 1;
                    item
                }
                Some(PoolMessage::Poison) | None => {
                    trace!("[{}-{}] poisoned", shared.name, id);
                    return;
                }
            }
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| action(item)));

        shared.lock_state().in_flight -= 1;
        shared.changed.notify_all();

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                shared.record_failure(WorkerPoolError::Failed { source });
                return;
            }
            Err(payload) => {
                shared.record_failure(WorkerPoolError::Panicked(panic_message(payload.as_ref())));
                return;
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
