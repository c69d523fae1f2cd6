//! LIFO stack on top of [`List`], top of stack at the list head.

use crate::list::{Iter, List};

pub struct Stack<T> {
    list: List<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Stack<T> {
        return Stack { list: List::new() };
    }

    /// Put a value on top.
    pub fn push(&mut self, value: T) {
        self.list.push_front(value);
    }

    /// Take the most recently pushed value, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
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

    /// Top to bottom.
    pub fn iter(&self) -> Iter<'_, T> {
        return self.list.iter();
    }

    /// Linear search the way a stack allows it: pop every value onto a
    /// holding stack while testing it, then pop the holding stack back.
    /// Matches come out top to bottom and the stack ends in its original
    /// order. Needs exclusive access for the whole pop/restore sequence,
    /// which `&mut self` enforces.
    pub fn scan<F>(&mut self, mut matches: F) -> List<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut found = List::new();
        let mut holding = Stack::new();
        while let Some(value) = self.pop() {
            if matches(&value) {
                found.append(value.clone());
            }
            holding.push(value);
        }
        while let Some(value) = holding.pop() {
            self.push(value);
        }
        return found;
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        return Self::new();
    }
}
