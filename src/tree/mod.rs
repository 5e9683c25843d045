//! Ordered maps backed by a Left-Leaning Red-Black Tree.
//!
//! - [`TreeMap`]: the map itself, with value semantics through copy-on-write
//! - [`TreeIndex`]: a detached, versioned position inside a map
//! - [`Traversal`]: visiting orders for [`TreeMap::traverse`]
//! - [`TreeStats`]: what [`TreeMap::validate`] reports for a sound tree
//!
//! # Examples
//!
//! ```rust
//! use llrb_treemap::tree::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for (position, letter) in ('A'..='Z').enumerate() {
//!     map.insert(letter, position);
//! }
//!
//! let before = map.clone();
//! map.remove(&'M');
//!
//! assert_eq!(map.len(), 25);
//! assert_eq!(before.len(), 26); // Original unchanged
//! assert_eq!(map.rank(&'N'), 12);
//! assert!(map.validate().is_ok());
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted pointer holding the root of a node graph.
///
/// With the `arc` feature this is `std::sync::Arc`, and maps are
/// `Send + Sync`. Otherwise it is `std::rc::Rc`.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod codec;
mod engine;
mod index;
mod iter;
mod map;
mod node;
mod statistics;
mod transform;
mod traversal;
mod validate;

pub use index::TreeIndex;
pub use iter::TreeMapIntoIterator;
pub use iter::TreeMapIterator;
pub use iter::TreeMapRangeIterator;
pub use map::TreeMap;
pub use traversal::Traversal;
pub use validate::TreeStats;

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(TreeMap<i32, i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(TreeMap<i32, String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::TreeMap;
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn test_clones_mutate_independently_on_other_threads() {
        let map: TreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let mut copy = map.clone();
                thread::spawn(move || {
                    for key in (worker..100).step_by(4) {
                        copy.remove(&key);
                    }
                    copy.insert(1000 + worker, worker);
                    assert!(copy.validate().is_ok());
                    copy
                })
            })
            .collect();

        for handle in handles {
            let copy = handle.join().expect("Thread panicked");
            assert_eq!(copy.len(), 76);
        }
        assert_eq!(map.len(), 100);
        assert_eq!(map.get(&0), Some(&0));
    }
}
