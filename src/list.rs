//! Doubly-linked list over a node arena.
//!
//! Nodes live in a `Vec` and link to each other by `u32` index, with
//! `NONE` standing in for the null pointer. Neither link owns anything, so
//! the list is acyclic by construction and there are no back-reference
//! cycles to break on drop. Slots freed by `pop_front`/`pop_back` go on a
//! free list (threaded through `next`) and are reused by later inserts, which
//! keeps every end operation O(1) even for long-lived stacks and queues.

use crate::collection::Collection;

/// Sentinel for "no node".
const NONE: u32 = u32::MAX;

struct Node<T> {
    /// `None` only while the slot sits on the free list.
    value: Option<T>,
    prev: u32,
    next: u32,
}

/// An ordered sequence of values with O(1) insertion and removal at both ends.
pub struct List<T> {
    nodes: Vec<Node<T>>,
    head: u32,
    tail: u32,
    /// Head of the free slot chain.
    free: u32,
    size: usize,
}

impl<T> List<T> {
    /// Create a new empty list.
    pub fn new() -> List<T> {
        return List {
            nodes: Vec::new(),
            head: NONE,
            tail: NONE,
            free: NONE,
            size: 0,
        };
    }

    /// Number of values in the list.
    pub fn len(&self) -> usize {
        return self.size;
    }

    pub fn is_empty(&self) -> bool {
        return self.head == NONE;
    }

    /// Add a value at the tail.
    pub fn append(&mut self, value: T) {
        let idx = self.alloc(value);
        if self.tail == NONE {
            self.head = idx;
        } else {
            self.nodes[self.tail as usize].next = idx;
            self.nodes[idx as usize].prev = self.tail;
        }
        self.tail = idx;
        self.size += 1;
    }

    /// Add a value at the head.
    pub fn push_front(&mut self, value: T) {
        let idx = self.alloc(value);
        if self.head == NONE {
            self.tail = idx;
        } else {
            self.nodes[self.head as usize].prev = idx;
            self.nodes[idx as usize].next = self.head;
        }
        self.head = idx;
        self.size += 1;
    }

    /// Remove and return the head value, or `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head == NONE {
            return None;
        }
        let idx = self.head;
        let next = self.nodes[idx as usize].next;
        self.head = next;
        if next == NONE {
            self.tail = NONE;
        } else {
            self.nodes[next as usize].prev = NONE;
        }
        self.size -= 1;
        return Some(self.release(idx));
    }

    /// Remove and return the tail value, or `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail == NONE {
            return None;
        }
        let idx = self.tail;
        let prev = self.nodes[idx as usize].prev;
        self.tail = prev;
        if prev == NONE {
            self.head = NONE;
        } else {
            self.nodes[prev as usize].next = NONE;
        }
        self.size -= 1;
        return Some(self.release(idx));
    }

    pub fn front(&self) -> Option<&T> {
        return self.value_at(self.head);
    }

    pub fn back(&self) -> Option<&T> {
        return self.value_at(self.tail);
    }

    /// Forget every value. Head, tail and size are reset and the arena is
    /// emptied without walking the links, though each value is still
    /// dropped, so this is linear in the number of values.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = NONE;
        self.tail = NONE;
        self.free = NONE;
        self.size = 0;
    }

    /// Iterate from head to tail without consuming the list.
    pub fn iter(&self) -> Iter<'_, T> {
        return Iter {
            list: self,
            cursor: self.head,
            remaining: self.size,
        };
    }

    /// Number of nodes in the left half, found the linked-list way: `slow`
    /// steps one node while `fast` steps two, and when `fast` can no longer
    /// take two steps `slow` is the last node of the left half.
    ///
    /// Lists of 0 or 1 values have no second half, so the whole list is
    /// "left".
    pub fn midpoint(&self) -> usize {
        if self.head == NONE {
            return 0;
        }
        let mut slow = self.head;
        let mut fast = self.head;
        let mut left = 1;
        loop {
            let one = self.nodes[fast as usize].next;
            if one == NONE {
                break;
            }
            let two = self.nodes[one as usize].next;
            if two == NONE {
                break;
            }
            fast = two;
            slow = self.nodes[slow as usize].next;
            left += 1;
        }
        debug_assert!(slow != NONE);
        return left;
    }

    fn value_at(&self, idx: u32) -> Option<&T> {
        if idx == NONE {
            return None;
        }
        return self.nodes[idx as usize].value.as_ref();
    }

    fn alloc(&mut self, value: T) -> u32 {
        if self.free != NONE {
            let idx = self.free;
            let node = &mut self.nodes[idx as usize];
            self.free = node.next;
            node.value = Some(value);
            node.prev = NONE;
            node.next = NONE;
            return idx;
        }
        let idx = self.nodes.len() as u32;
        assert!(idx != NONE, "list arena exhausted");
        self.nodes.push(Node { value: Some(value), prev: NONE, next: NONE });
        return idx;
    }

    fn release(&mut self, idx: u32) -> T {
        let node = &mut self.nodes[idx as usize];
        let value = node.value.take();
        node.prev = NONE;
        node.next = self.free;
        self.free = idx;
        // Linked slots always hold a value.
        return value.unwrap_or_else(|| unreachable!("linked node {idx} is empty"));
    }
}

impl<T> Collection for List<T> {
    fn len(&self) -> usize {
        return self.size;
    }

    /// Cut after the first `index` values. Values move, nothing is cloned.
    fn split(mut self, index: usize) -> (Self, Self) {
        let mut left = List::new();
        for _ in 0..index.min(self.size) {
            if let Some(value) = self.pop_front() {
                left.append(value);
            }
        }
        return (left, self);
    }

    fn append(&mut self, mut other: Self) {
        while let Some(value) = other.pop_front() {
            List::append(self, value);
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        return self.iter().cloned().collect();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        return self.size == other.size && self.iter().eq(other.iter());
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        return list;
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            List::append(self, value);
        }
    }
}

/// Borrowing head-to-tail iterator. Restartable: call `List::iter` again.
pub struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: u32,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == NONE {
            return None;
        }
        let node = &self.list.nodes[self.cursor as usize];
        self.cursor = node.next;
        self.remaining -= 1;
        return node.value.as_ref();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        return self.iter();
    }
}

/// Consuming iterator, pops from the head.
pub struct IntoIter<T>(List<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        return self.0.pop_front();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.0.size, Some(self.0.size));
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        return IntoIter(self);
    }
}
