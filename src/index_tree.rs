//! Height-balanced (AVL) index with duplicate-key groups.
//!
//! Nodes live in an arena addressed by `u32`, the same layout the list
//! uses. Each node holds one distinct normalized [`Key`] and a [`List`] of
//! every value that produced that key, in insertion order, so a thousand
//! customers from the same country cost one tree node rather than a
//! thousand. The tree only grows: there is no removal, and a different
//! ordering means building a new tree.
//!
//! Traversals are lazy and iterative. In-order walks keep their path on a
//! [`Stack`]; level-order walks use a [`Queue`], never the call stack.

use std::cmp::Ordering;
use std::fmt;

use crate::key::{IntoKey, Key};
use crate::list::List;
use crate::queue::Queue;
use crate::stack::Stack;

/// Sentinel for "no child".
const NONE: u32 = u32::MAX;

struct TreeNode<T> {
    key: Key,
    group: List<T>,
    left: u32,
    right: u32,
    /// Height of the subtree rooted here; a leaf is 1, an absent child 0.
    height: u32,
}

/// What an insertion did below a node.
enum Placed {
    /// Joined an existing group; the tree shape is unchanged.
    Grouped,
    /// Created a new leaf; ancestors must rebalance.
    Created,
}

/// An AVL tree keyed by a caller-supplied key function.
pub struct IndexTree<T> {
    nodes: Vec<TreeNode<T>>,
    root: u32,
    /// Values inserted, duplicates included.
    count: usize,
    keyfn: Box<dyn Fn(&T) -> Key>,
}

impl<T> IndexTree<T> {
    /// Create an empty tree that indexes values by `keyfn`.
    pub fn new<K, F>(keyfn: F) -> IndexTree<T>
    where
        K: IntoKey,
        F: Fn(&T) -> K + 'static,
    {
        return IndexTree {
            nodes: Vec::new(),
            root: NONE,
            count: 0,
            keyfn: Box::new(move |value: &T| keyfn(value).into_key()),
        };
    }

    /// Total number of inserted values, counting every duplicate.
    pub fn size(&self) -> usize {
        return self.count;
    }

    pub fn is_empty(&self) -> bool {
        return self.root == NONE;
    }

    /// Number of tree nodes, i.e. distinct keys.
    pub fn distinct_keys(&self) -> usize {
        return self.nodes.len();
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> u32 {
        return self.height_of(self.root);
    }

    pub fn root_key(&self) -> Option<&Key> {
        if self.root == NONE {
            return None;
        }
        return Some(&self.node(self.root).key);
    }

    /// Normalize `value`'s key with this tree's key function.
    pub fn key_of(&self, value: &T) -> Key {
        return (self.keyfn)(value);
    }

    /// Insert a value. An equal key joins that node's group; a new key
    /// becomes a leaf and every ancestor on the way back up is rebalanced.
    pub fn insert(&mut self, value: T) {
        let key = (self.keyfn)(&value);
        let (root, _) = self.insert_at(self.root, &key, value);
        self.root = root;
        self.count += 1;
    }

    /// Every value whose normalized key equals `key`, in insertion order.
    /// The returned list is a detached copy; it is empty when nothing
    /// matches.
    pub fn find(&self, key: impl IntoKey) -> List<T>
    where
        T: Clone,
    {
        return match self.group(&key.into_key()) {
            Some(group) => group.clone(),
            None => List::new(),
        };
    }

    /// Borrow the group for an already normalized key.
    pub fn group(&self, key: &Key) -> Option<&List<T>> {
        let mut idx = self.root;
        while idx != NONE {
            let node = self.node(idx);
            idx = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.group),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        return None;
    }

    /// Full in-order scan yielding each value the predicate accepts.
    ///
    /// The predicate may return a plain `bool`, an `Option<bool>` or a
    /// `Result<bool, E>`. A `None` or `Err` counts as "no match" for that
    /// one value and the scan carries on.
    pub fn find_by_predicate<'a, V, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        V: Verdict,
        P: FnMut(&T) -> V + 'a,
    {
        return self.in_order().filter(move |value| {
            match predicate(value).verdict() {
                Ok(matched) => matched,
                Err(reason) => {
                    tracing::trace!(%reason, "predicate failed, skipping value");
                    false
                }
            }
        });
    }

    /// Every stored value in ascending key order; duplicates come out in
    /// insertion order within their group.
    pub fn in_order(&self) -> impl Iterator<Item = &T> + '_ {
        return self.items().flat_map(|(_, group)| group.iter());
    }

    /// One `(key, group)` pair per distinct key, ascending.
    pub fn items(&self) -> Items<'_, T> {
        return Items::new(self);
    }

    /// Breadth-first `(key, group)` pairs, left to right within a level.
    pub fn level_order(&self) -> impl Iterator<Item = (&Key, &List<T>)> + '_ {
        return self.levels().map(|(_, key, group)| (key, group));
    }

    /// Breadth-first walk that also reports each node's depth (root is 0).
    pub fn levels(&self) -> LevelOrder<'_, T> {
        return LevelOrder::new(self);
    }

    /// Assert the structural invariants: BST ordering, cached heights, the
    /// AVL balance bound, non-empty groups and the value count.
    pub fn check_invariants(&self) {
        let mut total = 0;
        let height = self.check_subtree(self.root, None, None, &mut total);
        assert_eq!(height, self.height(), "INVARIANT VIOLATED: root height");
        assert_eq!(total, self.count, "INVARIANT VIOLATED: grouped values != size()");
    }

    fn check_subtree(&self, idx: u32, low: Option<&Key>, high: Option<&Key>, total: &mut usize) -> u32 {
        if idx == NONE {
            return 0;
        }
        let node = self.node(idx);
        if let Some(low) = low {
            assert!(node.key > *low, "INVARIANT VIOLATED: {} not above {}", node.key, low);
        }
        if let Some(high) = high {
            assert!(node.key < *high, "INVARIANT VIOLATED: {} not below {}", node.key, high);
        }
        assert!(!node.group.is_empty(), "INVARIANT VIOLATED: empty group at {}", node.key);
        *total += node.group.len();

        let left = self.check_subtree(node.left, low, Some(&node.key), total);
        let right = self.check_subtree(node.right, Some(&node.key), high, total);
        assert!(
            left.abs_diff(right) <= 1,
            "INVARIANT VIOLATED: balance {left} vs {right} at {}",
            node.key
        );
        assert_eq!(node.height, 1 + left.max(right), "INVARIANT VIOLATED: stale height at {}", node.key);
        return node.height;
    }

    // --- Insertion ---

    fn insert_at(&mut self, idx: u32, key: &Key, value: T) -> (u32, Placed) {
        if idx == NONE {
            return (self.alloc(key.clone(), value), Placed::Created);
        }
        let placed = match key.cmp(&self.node(idx).key) {
            Ordering::Equal => {
                self.node_mut(idx).group.append(value);
                return (idx, Placed::Grouped);
            }
            Ordering::Less => {
                let (child, placed) = self.insert_at(self.node(idx).left, key, value);
                self.node_mut(idx).left = child;
                placed
            }
            Ordering::Greater => {
                let (child, placed) = self.insert_at(self.node(idx).right, key, value);
                self.node_mut(idx).right = child;
                placed
            }
        };
        return match placed {
            Placed::Grouped => (idx, Placed::Grouped),
            Placed::Created => (self.rebalance(idx, key), Placed::Created),
        };
    }

    /// Restore the AVL bound at `idx` after `key` was inserted beneath it.
    /// Returns the index of whichever node now roots this subtree.
    fn rebalance(&mut self, idx: u32, key: &Key) -> u32 {
        self.update_height(idx);
        let balance = self.balance_factor(idx);

        if balance > 1 {
            let left = self.node(idx).left;
            match key.cmp(&self.node(left).key) {
                // left-left
                Ordering::Less => return self.rotate_right(idx),
                // left-right
                Ordering::Greater => {
                    let pivot = self.rotate_left(left);
                    self.node_mut(idx).left = pivot;
                    return self.rotate_right(idx);
                }
                Ordering::Equal => {}
            }
        }
        if balance < -1 {
            let right = self.node(idx).right;
            match key.cmp(&self.node(right).key) {
                // right-right
                Ordering::Greater => return self.rotate_left(idx),
                // right-left
                Ordering::Less => {
                    let pivot = self.rotate_right(right);
                    self.node_mut(idx).right = pivot;
                    return self.rotate_left(idx);
                }
                Ordering::Equal => {}
            }
        }
        return idx;
    }

    fn rotate_right(&mut self, y: u32) -> u32 {
        let x = self.node(y).left;
        let t2 = self.node(x).right;
        self.node_mut(x).right = y;
        self.node_mut(y).left = t2;
        self.update_height(y);
        self.update_height(x);
        return x;
    }

    fn rotate_left(&mut self, x: u32) -> u32 {
        let y = self.node(x).right;
        let t2 = self.node(y).left;
        self.node_mut(y).left = x;
        self.node_mut(x).right = t2;
        self.update_height(x);
        self.update_height(y);
        return y;
    }

    // --- Node helpers ---

    fn alloc(&mut self, key: Key, value: T) -> u32 {
        let idx = self.nodes.len() as u32;
        assert!(idx != NONE, "tree arena exhausted");
        let mut group = List::new();
        group.append(value);
        self.nodes.push(TreeNode { key, group, left: NONE, right: NONE, height: 1 });
        return idx;
    }

    #[inline(always)]
    fn node(&self, idx: u32) -> &TreeNode<T> {
        return &self.nodes[idx as usize];
    }

    #[inline(always)]
    fn node_mut(&mut self, idx: u32) -> &mut TreeNode<T> {
        return &mut self.nodes[idx as usize];
    }

    fn height_of(&self, idx: u32) -> u32 {
        if idx == NONE {
            return 0;
        }
        return self.node(idx).height;
    }

    fn update_height(&mut self, idx: u32) {
        let node = self.node(idx);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.node_mut(idx).height = height;
    }

    fn balance_factor(&self, idx: u32) -> i64 {
        let node = self.node(idx);
        return self.height_of(node.left) as i64 - self.height_of(node.right) as i64;
    }
}

impl<T> fmt::Debug for IndexTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("IndexTree")
            .field("size", &self.count)
            .field("distinct_keys", &self.nodes.len())
            .field("height", &self.height())
            .finish();
    }
}

/// The result of one predicate call during a scan.
pub trait Verdict {
    /// `Ok(matched)`, or `Err(reason)` when the predicate could not decide.
    fn verdict(self) -> Result<bool, String>;
}

impl Verdict for bool {
    fn verdict(self) -> Result<bool, String> {
        return Ok(self);
    }
}

impl Verdict for Option<bool> {
    fn verdict(self) -> Result<bool, String> {
        return self.ok_or_else(|| "no verdict".to_string());
    }
}

impl<E: fmt::Display> Verdict for Result<bool, E> {
    fn verdict(self) -> Result<bool, String> {
        return self.map_err(|e| e.to_string());
    }
}

/// Ascending `(key, group)` iterator. The path from the root to the next
/// node is kept on an explicit stack.
pub struct Items<'a, T> {
    tree: &'a IndexTree<T>,
    path: Stack<u32>,
    cursor: u32,
}

impl<'a, T> Items<'a, T> {
    fn new(tree: &'a IndexTree<T>) -> Items<'a, T> {
        return Items { tree, path: Stack::new(), cursor: tree.root };
    }
}

impl<'a, T> Iterator for Items<'a, T> {
    type Item = (&'a Key, &'a List<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != NONE {
            self.path.push(self.cursor);
            self.cursor = self.tree.node(self.cursor).left;
        }
        let idx = self.path.pop()?;
        let node = self.tree.node(idx);
        self.cursor = node.right;
        return Some((&node.key, &node.group));
    }
}

/// Breadth-first iterator yielding `(depth, key, group)`.
pub struct LevelOrder<'a, T> {
    tree: &'a IndexTree<T>,
    pending: Queue<(u32, usize)>,
}

impl<'a, T> LevelOrder<'a, T> {
    fn new(tree: &'a IndexTree<T>) -> LevelOrder<'a, T> {
        let mut pending = Queue::new();
        if tree.root != NONE {
            pending.enqueue((tree.root, 0));
        }
        return LevelOrder { tree, pending };
    }
}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = (usize, &'a Key, &'a List<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.pending.dequeue()?;
        let node = self.tree.node(idx);
        if node.left != NONE {
            self.pending.enqueue((node.left, depth + 1));
        }
        if node.right != NONE {
            self.pending.enqueue((node.right, depth + 1));
        }
        return Some((depth, &node.key, &node.group));
    }
}
