//! Tree nodes and the LLRB balancing primitives.
//!
//! A [`Node`] exclusively owns its children through `Box`, so a node graph
//! reachable from one root is a plain tree with no sharing below the root.
//! Sharing between map handles happens only at the root (see
//! [`TreeMap`](super::TreeMap)).
//!
//! Every primitive in this module takes the local subtree root by value and
//! returns the (possibly different) new local root. Count and spine caches of
//! every node whose children changed are refreshed before returning.

use std::mem;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of the link from a node's parent to the node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

/// One step of a root-to-node path.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub(crate) enum Direction {
    Left,
    Right,
}

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the Left-Leaning Red-Black Tree.
///
/// `left_spine` and `right_spine` hold the number of left (right) links
/// between this node and the minimum (maximum) of its subtree.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) count: usize,
    pub(crate) left_spine: usize,
    pub(crate) right_spine: usize,
    pub(crate) left: Option<Box<Self>>,
    pub(crate) right: Option<Box<Self>>,
}

/// Helper function to check if an optional node is red.
pub(crate) fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.is_some_and(Node::is_red)
}

/// Subtree size of an optional node.
pub(crate) fn size<K, V>(node: Option<&Node<K, V>>) -> usize {
    node.map_or(0, |node| node.count)
}

impl<K, V> Node<K, V> {
    /// Creates a new red leaf.
    pub(crate) const fn new_red(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            count: 1,
            left_spine: 0,
            right_spine: 0,
            left: None,
            right: None,
        }
    }

    /// Checks if this node is red.
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn left_node(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    pub(crate) fn right_node(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    pub(crate) fn child(&self, direction: Direction) -> Option<&Self> {
        match direction {
            Direction::Left => self.left_node(),
            Direction::Right => self.right_node(),
        }
    }

    /// Recomputes `count` and both spine lengths from the children.
    pub(crate) fn update(&mut self) {
        self.count = 1 + size(self.left_node()) + size(self.right_node());
        self.left_spine = self.left_node().map_or(0, |left| left.left_spine + 1);
        self.right_spine = self.right_node().map_or(0, |right| right.right_spine + 1);
    }

    /// The chain of nodes from this node's left child down to the subtree
    /// minimum. Empty when there is no left child.
    pub(crate) fn path_to_min(&self) -> Vec<&Self> {
        let mut path = Vec::with_capacity(self.left_spine);
        let mut current = self.left_node();
        while let Some(node) = current {
            path.push(node);
            current = node.left_node();
        }
        path
    }

    /// The chain of nodes from this node's right child down to the subtree
    /// maximum. Empty when there is no right child.
    pub(crate) fn path_to_max(&self) -> Vec<&Self> {
        let mut path = Vec::with_capacity(self.right_spine);
        let mut current = self.right_node();
        while let Some(node) = current {
            path.push(node);
            current = node.right_node();
        }
        path
    }

    /// The minimum node of this subtree, reached by following the cached
    /// left spine without key comparisons.
    pub(crate) fn min_node(&self) -> &Self {
        let mut node = self;
        for _ in 0..self.left_spine {
            match node.left_node() {
                Some(left) => node = left,
                None => break,
            }
        }
        node
    }

    /// The maximum node of this subtree.
    pub(crate) fn max_node(&self) -> &Self {
        let mut node = self;
        for _ in 0..self.right_spine {
            match node.right_node() {
                Some(right) => node = right,
                None => break,
            }
        }
        node
    }

    // =========================================================================
    // Balancing Primitives
    // =========================================================================

    //              (c)                       (c)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    (r)                 (r)  \
    //            /       \                 /     \
    //          left       x             node      xr
    //                    / \            /  \
    //                  xl   xr       left   xl
    //
    /// Rotates the subtree left, making the right child the new local root.
    ///
    /// # Panics
    ///
    /// Panics if the node has no right child.
    pub(crate) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut x) = self.right.take() else {
            panic!("rotate_left: node has no right child");
        };
        self.right = x.left.take();
        x.color = self.color;
        self.color = Color::Red;
        self.update();
        x.left = Some(self);
        x.update();
        x
    }

    //              (c)                       (c)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //            (r)   \                   (r)  \
    //           /       \                 /      \
    //          x       right             xl      node
    //         / \                                / \
    //       xl   xr                             xr  right
    //
    /// Rotates the subtree right, making the left child the new local root.
    ///
    /// # Panics
    ///
    /// Panics if the node has no left child.
    pub(crate) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut x) = self.left.take() else {
            panic!("rotate_right: node has no left child");
        };
        self.left = x.right.take();
        x.color = self.color;
        self.color = Color::Red;
        self.update();
        x.right = Some(self);
        x.update();
        x
    }

    /// Toggles the color of the node and of both children.
    ///
    /// # Panics
    ///
    /// Panics unless both children exist.
    pub(crate) fn flip_colors(&mut self) {
        match (self.left.as_deref_mut(), self.right.as_deref_mut()) {
            (Some(left), Some(right)) => {
                left.color = left.color.toggled();
                right.color = right.color.toggled();
            }
            _ => panic!("flip_colors: node requires both children"),
        }
        self.color = self.color.toggled();
    }

    /// Borrows a red link from the right sibling so that the left child (or
    /// one of its children) is red before descending left.
    pub(crate) fn move_red_left(mut self: Box<Self>) -> Box<Self> {
        self.flip_colors();
        if self
            .right_node()
            .is_some_and(|right| is_red(right.left_node()))
        {
            if let Some(right) = self.right.take() {
                self.right = Some(right.rotate_right());
            }
            self = self.rotate_left();
            self.flip_colors();
        }
        self
    }

    /// Mirror of [`Self::move_red_left`] used before descending right.
    pub(crate) fn move_red_right(mut self: Box<Self>) -> Box<Self> {
        self.flip_colors();
        if self.left_node().is_some_and(|left| is_red(left.left_node())) {
            self = self.rotate_right();
            self.flip_colors();
        }
        self
    }

    /// Restores the local LLRB shape after one of the children changed and
    /// refreshes the caches.
    pub(crate) fn fix_up(mut self: Box<Self>) -> Box<Self> {
        if is_red(self.right_node()) {
            self = self.rotate_left();
        }
        if self.left_node().is_some_and(|left| left.is_red() && is_red(left.left_node())) {
            self = self.rotate_right();
        }
        if is_red(self.left_node()) && is_red(self.right_node()) {
            self.flip_colors();
        }
        self.update();
        self
    }

    /// Replaces the entry stored in this node, returning the old one.
    pub(crate) fn replace_entry(&mut self, key: K, value: V) -> (K, V) {
        (
            mem::replace(&mut self.key, key),
            mem::replace(&mut self.value, value),
        )
    }

    /// Rebuilds this subtree with the same shape and colors, producing keys
    /// and values through the supplied functions.
    pub(crate) fn duplicate_with<L, W, F, G>(
        &self,
        key_function: &mut F,
        value_function: &mut G,
    ) -> Node<L, W>
    where
        F: FnMut(&K) -> L,
        G: FnMut(&V) -> W,
    {
        let left = self
            .left_node()
            .map(|left| Box::new(left.duplicate_with(key_function, value_function)));
        let key = key_function(&self.key);
        let value = value_function(&self.value);
        let right = self
            .right_node()
            .map(|right| Box::new(right.duplicate_with(key_function, value_function)));
        Node {
            key,
            value,
            color: self.color,
            count: self.count,
            left_spine: self.left_spine,
            right_spine: self.right_spine,
            left,
            right,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
