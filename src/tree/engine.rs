//! Recursive insert and delete over an owned node graph.
//!
//! Every function here works on a `slot`: the `Option<Box<Node>>` that holds
//! a subtree (the root slot of the map, or a child field of a node). Each
//! function takes the subtree out of the slot, restructures it, and puts the
//! new local root back.
//!
//! Deletion follows Sedgewick's left-leaning red-black algorithm: before
//! descending, the engine makes sure the node it is about to enter is not a
//! 2-node by borrowing a red link from a sibling (`move_red_left` /
//! `move_red_right`). Borrowing is speculative: it fires on the search path
//! even when the key turns out to be absent, and the `fix_up` calls on the
//! way back up restore an equivalent valid tree.

use std::borrow::Borrow;
use std::cmp::Ordering;

use super::node::{Color, Node, is_red};

impl<K, V> Node<K, V> {
    /// Consumes a detached node, returning its entry.
    fn into_entry(self: Box<Self>) -> (K, V) {
        let Self { key, value, .. } = *self;
        (key, value)
    }
}

fn fix_up_slot<K, V>(slot: &mut Option<Box<Node<K, V>>>) {
    if let Some(node) = slot.take() {
        *slot = Some(node.fix_up());
    }
}

fn blacken_root<K, V>(slot: &mut Option<Box<Node<K, V>>>) {
    if let Some(root) = slot.as_deref_mut() {
        root.color = Color::Black;
    }
}

/// Runs a deletion on the root slot: the root is reddened first when both
/// of its children are black, and forced black afterward.
fn delete_from_root<K, V, R>(
    slot: &mut Option<Box<Node<K, V>>>,
    delete: impl FnOnce(&mut Option<Box<Node<K, V>>>) -> R,
) -> R {
    if let Some(root) = slot.as_deref_mut()
        && !is_red(root.left_node())
        && !is_red(root.right_node())
    {
        root.color = Color::Red;
    }
    let result = delete(slot);
    blacken_root(slot);
    result
}

// =============================================================================
// Insertion
// =============================================================================

/// Inserts `key` into the tree held by the root slot.
///
/// When the key is absent a new red leaf is attached. When it is present,
/// `resolve` is called with the stored value and the new one; whatever it
/// returns is passed back to the caller (typically the displaced value).
///
/// An `Err` from `resolve` is returned immediately. Nothing below the
/// matching node has changed at that point, so the tree stays valid.
pub(crate) fn insert<K, V, E, F>(
    slot: &mut Option<Box<Node<K, V>>>,
    key: K,
    value: V,
    resolve: F,
) -> Result<Option<V>, E>
where
    K: Ord,
    F: FnOnce(&mut V, V) -> Result<Option<V>, E>,
{
    let displaced = insert_into(slot, key, value, resolve)?;
    blacken_root(slot);
    Ok(displaced)
}

fn insert_into<K, V, E, F>(
    slot: &mut Option<Box<Node<K, V>>>,
    key: K,
    value: V,
    resolve: F,
) -> Result<Option<V>, E>
where
    K: Ord,
    F: FnOnce(&mut V, V) -> Result<Option<V>, E>,
{
    let Some(node) = slot.as_deref_mut() else {
        *slot = Some(Box::new(Node::new_red(key, value)));
        return Ok(None);
    };
    let displaced = match key.cmp(&node.key) {
        Ordering::Less => insert_into(&mut node.left, key, value, resolve)?,
        Ordering::Greater => insert_into(&mut node.right, key, value, resolve)?,
        Ordering::Equal => resolve(&mut node.value, value)?,
    };
    fix_up_slot(slot);
    Ok(displaced)
}

// =============================================================================
// Deletion
// =============================================================================

/// Removes `key` from the tree held by the root slot, returning the removed
/// entry. The root may become empty.
pub(crate) fn remove<K, V, Q>(slot: &mut Option<Box<Node<K, V>>>, key: &Q) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    delete_from_root(slot, |slot| remove_from(slot, key))
}

/// Removes the minimum entry of the tree held by the root slot.
pub(crate) fn remove_min<K, V>(slot: &mut Option<Box<Node<K, V>>>) -> Option<(K, V)> {
    delete_from_root(slot, remove_min_from)
}

/// Removes the maximum entry of the tree held by the root slot.
pub(crate) fn remove_max<K, V>(slot: &mut Option<Box<Node<K, V>>>) -> Option<(K, V)> {
    delete_from_root(slot, remove_max_from)
}

fn remove_from<K, V, Q>(slot: &mut Option<Box<Node<K, V>>>, key: &Q) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut node = slot.take()?;

    let removed = if key.cmp(node.key.borrow()) == Ordering::Less {
        if node
            .left_node()
            .is_some_and(|left| !left.is_red() && !is_red(left.left_node()))
        {
            node = node.move_red_left();
        }
        remove_from(&mut node.left, key)
    } else {
        if is_red(node.left_node()) {
            node = node.rotate_right();
        }
        if key.cmp(node.key.borrow()) == Ordering::Equal && node.right.is_none() {
            *slot = node.left.take();
            return Some(node.into_entry());
        }
        if node
            .right_node()
            .is_some_and(|right| !right.is_red() && !is_red(right.left_node()))
        {
            node = node.move_red_right();
        }
        if key.cmp(node.key.borrow()) == Ordering::Equal {
            remove_min_from(&mut node.right)
                .map(|(successor_key, successor_value)| node.replace_entry(successor_key, successor_value))
        } else {
            remove_from(&mut node.right, key)
        }
    };

    *slot = Some(node.fix_up());
    removed
}

fn remove_min_from<K, V>(slot: &mut Option<Box<Node<K, V>>>) -> Option<(K, V)> {
    let mut node = slot.take()?;
    if node.left.is_none() {
        *slot = node.right.take();
        return Some(node.into_entry());
    }
    if node
        .left_node()
        .is_some_and(|left| !left.is_red() && !is_red(left.left_node()))
    {
        node = node.move_red_left();
    }
    let removed = remove_min_from(&mut node.left);
    *slot = Some(node.fix_up());
    removed
}

fn remove_max_from<K, V>(slot: &mut Option<Box<Node<K, V>>>) -> Option<(K, V)> {
    let mut node = slot.take()?;
    if is_red(node.left_node()) {
        node = node.rotate_right();
    }
    if node.right.is_none() {
        *slot = node.left.take();
        return Some(node.into_entry());
    }
    if node
        .right_node()
        .is_some_and(|right| !right.is_red() && !is_red(right.left_node()))
    {
        node = node.move_red_right();
    }
    let removed = remove_max_from(&mut node.right);
    *slot = Some(node.fix_up());
    removed
}

// =============================================================================
// Tests
// =============================================================================
