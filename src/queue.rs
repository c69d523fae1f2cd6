//! FIFO queue on top of [`List`]: enqueue at the tail, dequeue at the head.

use crate::list::{Iter, List};

pub struct Queue<T> {
    list: List<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Queue<T> {
        return Queue { list: List::new() };
    }

    pub fn enqueue(&mut self, value: T) {
        self.list.append(value);
    }

    /// Take the oldest value, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        return self.list.pop_front();
    }

    pub fn peek(&self) -> Option<&T> {
        return self.list.front();
    }

    pub fn len(&self) -> usize {
        return self.list.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.list.is_empty();
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        return self.list.iter();
    }

    /// Linear search by rotation: every value is dequeued, tested and
    /// enqueued again, so after one full turn the queue is back in its
    /// original order. Requires exclusive access until the turn completes.
    pub fn scan<F>(&mut self, mut matches: F) -> List<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut found = List::new();
        for _ in 0..self.len() {
            let Some(value) = self.dequeue() else { break };
            if matches(&value) {
                found.append(value.clone());
            }
            self.enqueue(value);
        }
        return found;
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeue_empty_is_none() {
        let mut queue: Queue<u32> = Queue::new();
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn first_in_first_out() {
        let mut queue = Queue::new();
        queue.enqueue("a");
        queue.enqueue("b");
        assert_eq!(queue.dequeue(), Some("a"));
        queue.enqueue("c");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some("b"));
        assert_eq!(queue.dequeue(), Some("c"));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn scan_is_a_full_rotation() {
        let mut queue = Queue::new();
        for i in 0..7u32 {
            queue.enqueue(i);
        }
        let hits = queue.scan(|v| *v > 3);
        assert_eq!(hits.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
    }
}
