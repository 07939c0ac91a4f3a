use crate::stream::queue::{FifoQueue, PriorityQueue};

/// Contract every queue discipline fulfils.
pub trait OrderingQueue<T>: Send {
    fn enqueue(&mut self, item: T);

    /// Remove the head; `None` on an empty queue, never a panic.
    fn try_dequeue(&mut self) -> Option<T>;

    /// Look at the head without removing it.
    fn peek(&self) -> Option<&T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which queue a pool drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueDiscipline {
    /// Arrival order.
    Fifo,
    /// Smallest item first.
    Priority,
}

impl QueueDiscipline {
    pub fn build<T>(self) -> Box<dyn OrderingQueue<T>>
    where
        T: Ord + Send + 'static,
    {
        match self {
            QueueDiscipline::Fifo => Box::new(FifoQueue::new()),
            QueueDiscipline::Priority => Box::new(PriorityQueue::new()),
        }
    }
}
