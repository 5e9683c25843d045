//! Error types for tree maps.
//!
//! This module provides the recoverable error values of the crate:
//!
//! - [`DecodeError`]: rejected input when rebuilding a map from its
//!   two-sequence boundary form.
//! - [`InvariantViolation`]: the first structural defect reported by
//!   [`TreeMap::validate`](crate::tree::TreeMap::validate).
//!
//! Precondition violations (out-of-range positions, stale indices) are not
//! represented here; they panic.

use std::fmt;

/// Represents an error when decoding a map from parallel key and value
/// sequences.
///
/// # Examples
///
/// ```rust
/// use llrb_treemap::error::DecodeError;
/// use llrb_treemap::tree::TreeMap;
///
/// let result = TreeMap::try_from_keys_and_values(vec![1, 2], vec!["one"]);
/// assert_eq!(
///     result.unwrap_err(),
///     DecodeError::LengthMismatch { keys: 2, values: 1 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The key and value sequences have different lengths.
    LengthMismatch {
        /// Number of decoded keys.
        keys: usize,
        /// Number of decoded values.
        values: usize,
    },
    /// The key at `position` repeats a key seen earlier in the sequence.
    DuplicateKey {
        /// Zero-based position of the repeated key in the key sequence.
        position: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { keys, values } => write!(
                formatter,
                "decoded {keys} keys but {values} values; sequences must have equal length"
            ),
            Self::DuplicateKey { position } => {
                write!(formatter, "decoded key at position {position} is a duplicate")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// A structural defect found while validating a tree.
///
/// `position` fields are the in-order position of the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// The key at `position` is not strictly greater than its predecessor.
    UnorderedKeys {
        /// In-order position of the node.
        position: usize,
    },
    /// The node at `position` has a red right child.
    RedRightLink {
        /// In-order position of the node.
        position: usize,
    },
    /// The node at `position` is red and has a red left child.
    ConsecutiveRedLinks {
        /// In-order position of the node.
        position: usize,
    },
    /// The subtrees of the node at `position` have different black heights.
    BlackHeightMismatch {
        /// In-order position of the node.
        position: usize,
    },
    /// The cached subtree size of the node at `position` is wrong.
    CountMismatch {
        /// In-order position of the node.
        position: usize,
        /// Size stored in the node.
        cached: usize,
        /// Size computed from the children.
        actual: usize,
    },
    /// The cached left or right spine length of the node at `position` is
    /// wrong.
    SpineMismatch {
        /// In-order position of the node.
        position: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root node is red"),
            Self::UnorderedKeys { position } => {
                write!(formatter, "key at position {position} is out of order")
            }
            Self::RedRightLink { position } => {
                write!(formatter, "node at position {position} has a red right link")
            }
            Self::ConsecutiveRedLinks { position } => write!(
                formatter,
                "node at position {position} and its left child are both red"
            ),
            Self::BlackHeightMismatch { position } => write!(
                formatter,
                "subtrees of node at position {position} have different black heights"
            ),
            Self::CountMismatch {
                position,
                cached,
                actual,
            } => write!(
                formatter,
                "node at position {position} caches count {cached} but holds {actual} entries"
            ),
            Self::SpineMismatch { position } => write!(
                formatter,
                "node at position {position} caches a stale min/max spine"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let error = DecodeError::LengthMismatch { keys: 3, values: 2 };
        assert_eq!(
            format!("{error}"),
            "decoded 3 keys but 2 values; sequences must have equal length"
        );
    }

    #[test]
    fn test_duplicate_key_display() {
        let error = DecodeError::DuplicateKey { position: 4 };
        assert_eq!(format!("{error}"), "decoded key at position 4 is a duplicate");
    }

    #[test]
    fn test_decode_error_variants_are_distinct() {
        assert_ne!(
            DecodeError::LengthMismatch { keys: 1, values: 0 },
            DecodeError::DuplicateKey { position: 1 }
        );
    }

    #[test]
    fn test_count_mismatch_display() {
        let violation = InvariantViolation::CountMismatch {
            position: 0,
            cached: 2,
            actual: 1,
        };
        assert_eq!(
            format!("{violation}"),
            "node at position 0 caches count 2 but holds 1 entries"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&DecodeError::DuplicateKey { position: 0 });
        assert_error(&InvariantViolation::RedRoot);
    }
}
