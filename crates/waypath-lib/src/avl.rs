//! Height-balanced ordered map used as the search frontier.
//!
//! [`AvlMap`] is a binary search tree that keeps, for every node, the heights
//! of its two subtrees within one of each other. Insertion, removal and
//! minimum access therefore stay `O(log n)` regardless of the order in which
//! keys arrive, which is what lets the shortest-path engine use it in place of
//! a binary heap: unlike a heap it supports removing an arbitrary key, so a
//! decrease-key can be expressed as "remove the old entry, insert the new one".
//!
//! Every mutating call is written as a recursive function that consumes an
//! owned subtree and hands back the (possibly new) subtree root, so parents
//! simply re-assign their child link as the recursion unwinds.
//!
//! # Example
//!
//! ```
//! use waypath_lib::AvlMap;
//!
//! let mut map = AvlMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! assert_eq!(map.first_key_value(), Some((&1, &"one")));
//! assert_eq!(map.remove(&1), Some("one"));
//! assert_eq!(map.get(&2), Some(&"two"));
//! assert!(map.is_balanced());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone, PartialEq, Eq)]
struct Node<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Ordered key/value map backed by an AVL tree.
///
/// Equality compares tree shape as well as contents: two maps holding the
/// same entries but built through different operation sequences may differ.
#[derive(Clone, PartialEq, Eq)]
pub struct AvlMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> AvlMap<K, V> {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of entries stored in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; `0` when empty, `1` for a single entry.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Smallest entry of the map, or `None` when it is empty.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// In-order iterator over the entries, smallest key first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Insert `value` under `key`, or overwrite the value already stored there.
    ///
    /// A new key adds a leaf and rebalances every ancestor on the way back to
    /// the root. An existing key only has its value replaced: the tree shape
    /// depends on keys alone, so no rotation happens and the previous value is
    /// returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut previous = None;
        self.root = Some(insert_node(self.root.take(), key, value, &mut previous));
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove `key` from the map, returning its value when it was present.
    ///
    /// A node with two children is replaced by its in-order successor, which
    /// is detached from the right subtree first. Removing from an empty map or
    /// removing a missing key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        self.root = remove_node(self.root.take(), key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Remove and return the smallest entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root.take()?;
        let (rest, min) = take_min(root);
        self.root = rest;
        self.len -= 1;
        let Node { key, value, .. } = *min;
        Some((key, value))
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Check the structural invariants of the whole tree.
    ///
    /// Returns `true` when the in-order key sequence is strictly increasing,
    /// every cached height matches the real subtree height, and no node has a
    /// balance factor outside `-1..=1`.
    pub fn is_balanced(&self) -> bool {
        check_subtree(&self.root, None, None).is_some()
    }
}

fn insert_node<K: Ord, V>(
    link: Link<K, V>,
    key: K,
    value: V,
    previous: &mut Option<V>,
) -> Box<Node<K, V>> {
    let Some(mut node) = link else {
        return Node::leaf(key, value);
    };

    match key.cmp(&node.key) {
        Ordering::Less => {
            node.left = Some(insert_node(node.left.take(), key, value, previous));
        }
        Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), key, value, previous));
        }
        Ordering::Equal => {
            *previous = Some(mem::replace(&mut node.value, value));
            return node;
        }
    }

    if previous.is_some() {
        return node;
    }
    rebalance(node)
}

fn remove_node<K: Ord, V>(link: Link<K, V>, key: &K, removed: &mut Option<V>) -> Link<K, V> {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), key, removed),
        Ordering::Equal => {
            let Node {
                value, left, right, ..
            } = *node;
            *removed = Some(value);
            return match (left, right) {
                (None, child) | (child, None) => child,
                (Some(left), Some(right)) => {
                    let (rest, mut successor) = take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(rebalance(successor))
                }
            };
        }
    }

    if removed.is_none() {
        return Some(node);
    }
    Some(rebalance(node))
}

/// Detach the leftmost node of `node`, returning the remaining subtree and
/// the detached node (with both child links cleared).
fn take_min<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            node.height = 1;
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

/// Restore the AVL property at `node`, assuming both subtrees already hold it.
///
/// The rotation case is chosen from the heavy child's own balance factor.
/// After an insertion this agrees with comparing the new key against the
/// child's key, and after a removal it is the only information available.
fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Returns the verified height of the subtree, or `None` on any violation.
fn check_subtree<K: Ord, V>(
    link: &Link<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Option<usize> {
    let Some(node) = link else {
        return Some(0);
    };

    let below = lower.is_some_and(|bound| node.key <= *bound);
    let above = upper.is_some_and(|bound| node.key >= *bound);
    if below || above {
        return None;
    }

    let left = check_subtree(&node.left, lower, Some(&node.key))?;
    let right = check_subtree(&node.right, Some(&node.key), upper)?;
    let height = 1 + left.max(right);

    (left.abs_diff(right) <= 1 && node.height == height).then_some(height)
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator returned by [`AvlMap::iter`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
