use crate::stream::queue::OrderingQueue;

/// Binary min-heap stored in a flat vector.
///
/// Heap order: every parent is `<=` both of its children, so the root is
/// always the smallest queued item. Equal items may leave in any order.
#[derive(Debug)]
pub struct PriorityQueue<T> {
    data: Vec<T>,
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.data[child] >= self.data[parent] {
                break;
            }
            self.data.swap(child, parent);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut parent: usize) {
        let len = self.data.len();
        loop {
            let left = parent * 2 + 1;
            if left >= len {
                break; // leaf
            }

            let right = left + 1;
            let smaller = if right < len && self.data[right] < self.data[left] {
                right
            } else {
                left
            };

            if self.data[parent] <= self.data[smaller] {
                break;
            }
            self.data.swap(parent, smaller);
            parent = smaller;
        }
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Send> OrderingQueue<T> for PriorityQueue<T> {
    fn enqueue(&mut self, item: T) {
        self.data.push(item);
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    fn try_dequeue(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }

        // move the last leaf to the root, then restore heap order
        let item = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
