//! Callback traversals in the five classic orders.

use std::collections::VecDeque;
use std::convert::Infallible;

use super::TreeMap;
use super::node::Node;

/// The order in which [`TreeMap::traverse`] visits entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Ascending key order.
    InOrder,
    /// Descending key order.
    Reverse,
    /// Node before its left and right subtrees.
    PreOrder,
    /// Left and right subtrees before the node.
    PostOrder,
    /// Breadth-first, top level first, left to right within a level.
    LevelOrder,
}

fn in_order<K, V, E>(
    node: Option<&Node<K, V>>,
    visit: &mut impl FnMut(&K, &V) -> Result<(), E>,
) -> Result<(), E> {
    if let Some(node) = node {
        in_order(node.left_node(), visit)?;
        visit(&node.key, &node.value)?;
        in_order(node.right_node(), visit)?;
    }
    Ok(())
}

fn reverse<K, V, E>(
    node: Option<&Node<K, V>>,
    visit: &mut impl FnMut(&K, &V) -> Result<(), E>,
) -> Result<(), E> {
    if let Some(node) = node {
        reverse(node.right_node(), visit)?;
        visit(&node.key, &node.value)?;
        reverse(node.left_node(), visit)?;
    }
    Ok(())
}

fn pre_order<K, V, E>(
    node: Option<&Node<K, V>>,
    visit: &mut impl FnMut(&K, &V) -> Result<(), E>,
) -> Result<(), E> {
    if let Some(node) = node {
        visit(&node.key, &node.value)?;
        pre_order(node.left_node(), visit)?;
        pre_order(node.right_node(), visit)?;
    }
    Ok(())
}

fn post_order<K, V, E>(
    node: Option<&Node<K, V>>,
    visit: &mut impl FnMut(&K, &V) -> Result<(), E>,
) -> Result<(), E> {
    if let Some(node) = node {
        post_order(node.left_node(), visit)?;
        post_order(node.right_node(), visit)?;
        visit(&node.key, &node.value)?;
    }
    Ok(())
}

fn level_order<K, V, E>(
    root: Option<&Node<K, V>>,
    visit: &mut impl FnMut(&K, &V) -> Result<(), E>,
) -> Result<(), E> {
    let mut queue: VecDeque<&Node<K, V>> = root.into_iter().collect();
    while let Some(node) = queue.pop_front() {
        visit(&node.key, &node.value)?;
        queue.extend(node.left_node());
        queue.extend(node.right_node());
    }
    Ok(())
}

impl<K, V> TreeMap<K, V> {
    /// Calls `visit` on every entry in the given order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::{Traversal, TreeMap};
    ///
    /// let map: TreeMap<i32, ()> = (1..=3).map(|key| (key, ())).collect();
    /// let mut keys = Vec::new();
    /// map.traverse(Traversal::PreOrder, |key, _| keys.push(*key));
    /// assert_eq!(keys, vec![2, 1, 3]);
    /// ```
    pub fn traverse<F>(&self, order: Traversal, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        let result = self.try_traverse(order, |key, value| {
            visit(key, value);
            Ok::<(), Infallible>(())
        });
        if let Err(never) = result {
            match never {}
        }
    }

    /// Calls `visit` on every entry in the given order, stopping at the
    /// first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visit`; no further entries are
    /// visited.
    pub fn try_traverse<F, E>(&self, order: Traversal, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        let root = self.root_node();
        match order {
            Traversal::InOrder => in_order(root, &mut visit),
            Traversal::Reverse => reverse(root, &mut visit),
            Traversal::PreOrder => pre_order(root, &mut visit),
            Traversal::PostOrder => post_order(root, &mut visit),
            Traversal::LevelOrder => level_order(root, &mut visit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Seven ascending inserts produce a perfect tree rooted at 3.
    fn perfect() -> TreeMap<i32, i32> {
        (0..7).map(|key| (key, key)).collect()
    }

    fn visited(map: &TreeMap<i32, i32>, order: Traversal) -> Vec<i32> {
        let mut keys = Vec::new();
        map.traverse(order, |key, _| keys.push(*key));
        keys
    }

    #[rstest]
    #[case(Traversal::InOrder, vec![0, 1, 2, 3, 4, 5, 6])]
    #[case(Traversal::Reverse, vec![6, 5, 4, 3, 2, 1, 0])]
    #[case(Traversal::PreOrder, vec![3, 1, 0, 2, 5, 4, 6])]
    #[case(Traversal::PostOrder, vec![0, 2, 1, 4, 6, 5, 3])]
    #[case(Traversal::LevelOrder, vec![3, 1, 5, 0, 2, 4, 6])]
    fn test_traversal_orders(#[case] order: Traversal, #[case] expected: Vec<i32>) {
        let map = perfect();
        assert_eq!(map.height(), 3);
        assert_eq!(visited(&map, order), expected);
    }

    #[rstest]
    fn test_try_traverse_stops_at_first_error() {
        let map = perfect();
        let mut seen = Vec::new();
        let result = map.try_traverse(Traversal::InOrder, |key, _| {
            if *key == 3 {
                return Err(*key);
            }
            seen.push(*key);
            Ok(())
        });
        assert_eq!(result, Err(3));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[rstest]
    fn test_traverse_empty_map_visits_nothing() {
        let map: TreeMap<i32, i32> = TreeMap::new();
        for order in [
            Traversal::InOrder,
            Traversal::Reverse,
            Traversal::PreOrder,
            Traversal::PostOrder,
            Traversal::LevelOrder,
        ] {
            assert!(visited(&map, order).is_empty());
        }
    }
}
