//! Ordering queues shared by the threads of one worker pool.
//!
//! Two disciplines:
//! - FIFO: items leave in arrival order.
//! - Priority: a binary min-heap, the smallest item always leaves first.
//!
//! Queues are not synchronised themselves; the owning pool guards every access
//! with its mutex.

pub mod types;
pub mod fifo;
pub mod priority;

pub use types::{OrderingQueue, QueueDiscipline};
pub use fifo::FifoQueue;
pub use priority::PriorityQueue;
