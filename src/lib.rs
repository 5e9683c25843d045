//! # llrb-treemap
//!
//! An ordered key/value map with value semantics, backed by a Left-Leaning
//! Red-Black Tree augmented with subtree sizes.
//!
//! ## Overview
//!
//! - **Ordered map**: O(log N) lookup, insertion and deletion with
//!   guaranteed balance
//! - **Order statistics**: rank, select, floor, ceiling and range counts in
//!   O(log N)
//! - **Copy-on-write**: clones are O(1) and share storage until one of them
//!   is written
//! - **Versioned indices**: detached positions that detect use after the map
//!   changed
//! - **Transforms**: map, filter, merge and grouping built on the core
//!   operations
//!
//! ## Feature Flags
//!
//! - `arc`: share node graphs through `Arc` instead of `Rc`, making maps
//!   `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` as parallel `keys` and `values`
//!   sequences
//!
//! ## Example
//!
//! ```rust
//! use llrb_treemap::prelude::*;
//!
//! let map: TreeMap<&str, i32> =
//!     [("A", 10), ("B", 20), ("C", 15), ("D", 7), ("E", 1)].into_iter().collect();
//!
//! assert_eq!(map.select(2), (&"C", &15));
//! assert_eq!(map.rank(&"C"), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use llrb_treemap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{DecodeError, InvariantViolation};
    pub use crate::tree::{Traversal, TreeIndex, TreeMap, TreeStats};
}

pub mod error;
pub mod tree;
