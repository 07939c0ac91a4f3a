use std::collections::VecDeque;

use crate::stream::queue::OrderingQueue;

/// First-in, first-out queue.
#[derive(Debug)]
pub struct FifoQueue<T> {
    items: VecDeque<T>,
}

impl<T> FifoQueue<T> {
    pub fn new() -> Self {
        Self { items: VecDeque::new() }
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> OrderingQueue<T> for FifoQueue<T> {
    fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    fn try_dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
