//! Iterators over a [`TreeMap`](super::TreeMap).
//!
//! Borrowing iterators keep two explicit stacks of node references, one for
//! each end, so stepping never searches from the root. A shared counter of
//! remaining entries keeps the two ends from crossing.

use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::Node;
use super::statistics;

type Stack<'a, K, V> = SmallVec<[&'a Node<K, V>; 32]>;

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`TreeMap`](super::TreeMap) in
/// ascending key order.
pub struct TreeMapIterator<'a, K, V> {
    front: Stack<'a, K, V>,
    back: Stack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> TreeMapIterator<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        let mut iterator = Self {
            front: Stack::new(),
            back: Stack::new(),
            remaining: root.map_or(0, |root| root.count),
        };
        push_left_spine(&mut iterator.front, root);
        push_right_spine(&mut iterator.back, root);
        iterator
    }
}

fn push_left_spine<'a, K, V>(stack: &mut Stack<'a, K, V>, mut node: Option<&'a Node<K, V>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.left_node();
    }
}

fn push_right_spine<'a, K, V>(stack: &mut Stack<'a, K, V>, mut node: Option<&'a Node<K, V>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.right_node();
    }
}

impl<'a, K, V> Iterator for TreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        push_left_spine(&mut self.front, node.right_node());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for TreeMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        push_right_spine(&mut self.back, node.left_node());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for TreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for TreeMapIterator<'_, K, V> {}

// =============================================================================
// Range Iterator Implementation
// =============================================================================

/// A range iterator over key-value pairs of a [`TreeMap`](super::TreeMap).
pub struct TreeMapRangeIterator<'a, K, V> {
    inner: TreeMapIterator<'a, K, V>,
}

impl<'a, K, V> TreeMapRangeIterator<'a, K, V> {
    /// Seeds the front stack at the first key inside the start bound and the
    /// back stack at the last key inside the end bound.
    pub(crate) fn new<Q, R>(root: Option<&'a Node<K, V>>, range: &R) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let mut front = Stack::new();
        let mut node = root;
        while let Some(current) = node {
            let key = current.key.borrow();
            let inside = match range.start_bound() {
                Bound::Included(start) => key >= start,
                Bound::Excluded(start) => key > start,
                Bound::Unbounded => true,
            };
            if inside {
                front.push(current);
                node = current.left_node();
            } else {
                node = current.right_node();
            }
        }

        let mut back = Stack::new();
        let mut node = root;
        while let Some(current) = node {
            let key = current.key.borrow();
            let inside = match range.end_bound() {
                Bound::Included(end) => key <= end,
                Bound::Excluded(end) => key < end,
                Bound::Unbounded => true,
            };
            if inside {
                back.push(current);
                node = current.right_node();
            } else {
                node = current.left_node();
            }
        }

        Self {
            inner: TreeMapIterator {
                front,
                back,
                remaining: statistics::count_in_range(root, range),
            },
        }
    }
}

impl<'a, K, V> Iterator for TreeMapRangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for TreeMapRangeIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for TreeMapRangeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for TreeMapRangeIterator<'_, K, V> {}

// =============================================================================
// IntoIterator Implementation
// =============================================================================

/// An owning iterator over key-value pairs of a [`TreeMap`](super::TreeMap).
///
/// Entries are moved out of the nodes when the map held the only reference
/// to its storage, and cloned otherwise.
pub struct TreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K: Clone, V: Clone> TreeMapIntoIterator<K, V> {
    pub(crate) fn new(root: Option<ReferenceCounter<Node<K, V>>>) -> Self {
        let mut entries = Vec::with_capacity(root.as_ref().map_or(0, |root| root.count));
        if let Some(root) = root {
            match ReferenceCounter::try_unwrap(root) {
                Ok(node) => drain_in_order(node, &mut entries),
                Err(shared) => entries.extend(
                    TreeMapIterator::new(Some(&*shared))
                        .map(|(key, value)| (key.clone(), value.clone())),
                ),
            }
        }
        Self {
            entries: entries.into_iter(),
        }
    }
}

fn drain_in_order<K, V>(node: Node<K, V>, entries: &mut Vec<(K, V)>) {
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = node;
    if let Some(left) = left {
        drain_in_order(*left, entries);
    }
    entries.push((key, value));
    if let Some(right) = right {
        drain_in_order(*right, entries);
    }
}

impl<K, V> Iterator for TreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for TreeMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for TreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> FusedIterator for TreeMapIntoIterator<K, V> {}
