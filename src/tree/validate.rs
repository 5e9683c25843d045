//! Structural validation of a node graph.

use super::node::{Node, is_red};
use crate::error::InvariantViolation;

/// Shape summary of a valid tree, returned by
/// [`TreeMap::validate`](super::TreeMap::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Number of entries.
    pub len: usize,
    /// Number of nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Number of black nodes on every root-to-leaf path.
    pub black_height: usize,
}

struct Summary {
    count: usize,
    height: usize,
    black_height: usize,
}

struct Checker<'a, K> {
    position: usize,
    previous: Option<&'a K>,
}

impl<'a, K: Ord> Checker<'a, K> {
    fn visit<V>(&mut self, node: Option<&'a Node<K, V>>) -> Result<Summary, InvariantViolation> {
        let Some(node) = node else {
            return Ok(Summary {
                count: 0,
                height: 0,
                black_height: 0,
            });
        };

        let left = self.visit(node.left_node())?;

        let position = self.position;
        if self.previous.is_some_and(|previous| *previous >= node.key) {
            return Err(InvariantViolation::UnorderedKeys { position });
        }
        self.previous = Some(&node.key);
        self.position += 1;

        let right = self.visit(node.right_node())?;

        if is_red(node.right_node()) {
            return Err(InvariantViolation::RedRightLink { position });
        }
        if node.is_red() && is_red(node.left_node()) {
            return Err(InvariantViolation::ConsecutiveRedLinks { position });
        }
        if left.black_height != right.black_height {
            return Err(InvariantViolation::BlackHeightMismatch { position });
        }

        let actual = 1 + left.count + right.count;
        if node.count != actual {
            return Err(InvariantViolation::CountMismatch {
                position,
                cached: node.count,
                actual,
            });
        }

        if node.left_spine != node.path_to_min().len()
            || node.right_spine != node.path_to_max().len()
        {
            return Err(InvariantViolation::SpineMismatch { position });
        }

        Ok(Summary {
            count: actual,
            height: 1 + left.height.max(right.height),
            black_height: left.black_height + usize::from(!node.is_red()),
        })
    }
}

/// Checks every LLRB, ordering and cache invariant of the tree rooted at
/// `root`.
pub(crate) fn validate<K: Ord, V>(root: Option<&Node<K, V>>) -> Result<TreeStats, InvariantViolation> {
    if is_red(root) {
        return Err(InvariantViolation::RedRoot);
    }
    let mut checker = Checker {
        position: 0,
        previous: None,
    };
    let summary = checker.visit(root)?;
    Ok(TreeStats {
        len: summary.count,
        height: summary.height,
        black_height: summary.black_height,
    })
}
