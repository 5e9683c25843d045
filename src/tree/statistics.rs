//! Read-only queries derived from BST ordering and per-node subtree sizes.
//!
//! All functions walk the shared node graph directly and never clone.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

use super::node::{Node, size};

/// Finds the node holding `key`.
pub(crate) fn find<'a, K, V, Q>(mut node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while let Some(current) = node {
        match key.cmp(current.key.borrow()) {
            Ordering::Less => node = current.left_node(),
            Ordering::Greater => node = current.right_node(),
            Ordering::Equal => return Some(current),
        }
    }
    None
}

/// Finds the value stored under `key` for in-place modification.
pub(crate) fn find_mut<'a, K, V, Q>(node: Option<&'a mut Node<K, V>>, key: &Q) -> Option<&'a mut V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let current = node?;
    match key.cmp(current.key.borrow()) {
        Ordering::Less => find_mut(current.left.as_deref_mut(), key),
        Ordering::Greater => find_mut(current.right.as_deref_mut(), key),
        Ordering::Equal => Some(&mut current.value),
    }
}

/// Number of keys strictly less than `key`.
pub(crate) fn rank<K, V, Q>(mut node: Option<&Node<K, V>>, key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut rank = 0;
    while let Some(current) = node {
        match key.cmp(current.key.borrow()) {
            Ordering::Less => node = current.left_node(),
            Ordering::Greater => {
                rank += 1 + size(current.left_node());
                node = current.right_node();
            }
            Ordering::Equal => return rank + size(current.left_node()),
        }
    }
    rank
}

/// Number of keys less than or equal to `key`.
fn rank_inclusive<K, V, Q>(node: Option<&Node<K, V>>, key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    rank(node, key) + usize::from(find(node, key).is_some())
}

/// The node with the largest key less than or equal to `key`.
///
/// Descends like a search and remembers the last node where the walk turned
/// right; that ancestor is the answer when the key itself is missing.
pub(crate) fn floor<'a, K, V, Q>(mut node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut candidate = None;
    while let Some(current) = node {
        match key.cmp(current.key.borrow()) {
            Ordering::Less => node = current.left_node(),
            Ordering::Greater => {
                candidate = Some(current);
                node = current.right_node();
            }
            Ordering::Equal => return Some(current),
        }
    }
    candidate
}

/// The node with the smallest key greater than or equal to `key`.
pub(crate) fn ceiling<'a, K, V, Q>(mut node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut candidate = None;
    while let Some(current) = node {
        match key.cmp(current.key.borrow()) {
            Ordering::Less => {
                candidate = Some(current);
                node = current.left_node();
            }
            Ordering::Greater => node = current.right_node(),
            Ordering::Equal => return Some(current),
        }
    }
    candidate
}

/// The node at 0-based in-order `position`, or `None` when out of range.
pub(crate) fn select<K, V>(mut node: Option<&Node<K, V>>, mut position: usize) -> Option<&Node<K, V>> {
    while let Some(current) = node {
        let left_size = size(current.left_node());
        match position.cmp(&left_size) {
            Ordering::Less => node = current.left_node(),
            Ordering::Greater => {
                position -= left_size + 1;
                node = current.right_node();
            }
            Ordering::Equal => return Some(current),
        }
    }
    None
}

/// Number of keys that fall within `range`.
pub(crate) fn count_in_range<K, V, Q, R>(node: Option<&Node<K, V>>, range: &R) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    let below_start = match range.start_bound() {
        Bound::Included(start) => rank(node, start),
        Bound::Excluded(start) => rank_inclusive(node, start),
        Bound::Unbounded => 0,
    };
    let up_to_end = match range.end_bound() {
        Bound::Included(end) => rank_inclusive(node, end),
        Bound::Excluded(end) => rank(node, end),
        Bound::Unbounded => size(node),
    };
    up_to_end.saturating_sub(below_start)
}

/// Number of nodes on the longest root-to-leaf path.
pub(crate) fn height<K, V>(node: Option<&Node<K, V>>) -> usize {
    node.map_or(0, |node| {
        1 + height(node.left_node()).max(height(node.right_node()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::engine;
    use rstest::{fixture, rstest};
    use std::convert::Infallible;

    type Slot = Option<Box<Node<i32, i32>>>;

    /// Keys 10, 20, ..., 100.
    #[fixture]
    fn tens() -> Slot {
        let mut slot = None;
        for key in (1..=10).map(|key| key * 10) {
            engine::insert(&mut slot, key, key + 1, |stored, value| {
                Ok::<_, Infallible>(Some(std::mem::replace(stored, value)))
            })
            .unwrap();
        }
        slot
    }

    #[rstest]
    #[case(5, 0)]
    #[case(10, 0)]
    #[case(15, 1)]
    #[case(100, 9)]
    #[case(101, 10)]
    fn test_rank(tens: Slot, #[case] key: i32, #[case] expected: usize) {
        assert_eq!(rank(tens.as_deref(), &key), expected);
    }

    #[rstest]
    #[case(5, None)]
    #[case(10, Some(10))]
    #[case(55, Some(50))]
    #[case(1000, Some(100))]
    fn test_floor(tens: Slot, #[case] key: i32, #[case] expected: Option<i32>) {
        assert_eq!(floor(tens.as_deref(), &key).map(|node| node.key), expected);
    }

    #[rstest]
    #[case(5, Some(10))]
    #[case(55, Some(60))]
    #[case(100, Some(100))]
    #[case(101, None)]
    fn test_ceiling(tens: Slot, #[case] key: i32, #[case] expected: Option<i32>) {
        assert_eq!(ceiling(tens.as_deref(), &key).map(|node| node.key), expected);
    }

    #[rstest]
    fn test_select_matches_rank(tens: Slot) {
        for position in 0..10 {
            let node = select(tens.as_deref(), position).unwrap();
            assert_eq!(rank(tens.as_deref(), &node.key), position);
        }
        assert!(select(tens.as_deref(), 10).is_none());
    }

    #[rstest]
    fn test_count_in_range(tens: Slot) {
        let root = tens.as_deref();
        assert_eq!(count_in_range(root, &(20..50)), 3);
        assert_eq!(count_in_range(root, &(20..=50)), 4);
        assert_eq!(count_in_range(root, &(..)), 10);
        assert_eq!(count_in_range(root, &(95..)), 1);
        assert_eq!(count_in_range(root, &(50..20)), 0);
        assert_eq!(
            count_in_range(root, &(Bound::Excluded(20), Bound::Unbounded)),
            8
        );
    }

    #[rstest]
    fn test_find_mut_updates_value(mut tens: Slot) {
        *find_mut(tens.as_deref_mut(), &30).unwrap() = 0;
        assert_eq!(find(tens.as_deref(), &30).map(|node| node.value), Some(0));
        assert!(find_mut(tens.as_deref_mut(), &31).is_none());
    }

    #[rstest]
    fn test_height_is_logarithmic(tens: Slot) {
        let height = height(tens.as_deref());
        assert!(height >= 4);
        assert!(height <= 7);
    }
}
