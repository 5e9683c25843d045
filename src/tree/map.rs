//! Ordered map with value semantics based on a Left-Leaning Red-Black Tree.
//!
//! This module provides [`TreeMap`], a sorted key/value map whose clones are
//! independent values that share storage until one of them is written.
//!
//! # Overview
//!
//! - O(log N) get, insert, remove
//! - O(log N) rank, floor, ceiling, select
//! - O(log N) min/max through the cached spine, without key comparisons
//! - O(1) len, `is_empty` and clone
//!
//! # Copy-on-Write
//!
//! A clone shares the whole node graph with the original. The first
//! mutating call on either handle finds the root shared and deep-clones the
//! graph before writing, so neither handle ever observes the other's writes.
//!
//! # Examples
//!
//! ```rust
//! use llrb_treemap::tree::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! let snapshot = map.clone();
//! map.remove(&2);
//!
//! assert_eq!(snapshot.len(), 3); // Clone unchanged
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.rank(&3), 1);
//! assert_eq!(map.select(0), (&1, &"one"));
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::mem;
use std::ops::RangeBounds;

use super::ReferenceCounter;
use super::engine;
use super::index::{Path, TreeIndex, Version};
use super::iter::{TreeMapIntoIterator, TreeMapIterator, TreeMapRangeIterator};
use super::node::{Direction, Node, size};
use super::statistics;
use super::validate::{self, TreeStats};
use crate::error::InvariantViolation;

// =============================================================================
// TreeMap Definition
// =============================================================================

/// An ordered map with value semantics, backed by a Left-Leaning Red-Black
/// Tree.
///
/// Keys must implement `Ord`. Reading operations walk the shared structure
/// directly; mutating operations require `K: Clone` and `V: Clone` because a
/// shared node graph is deep-cloned before the first write. Store keys or
/// values behind `Rc`/`Arc` to share them by reference between clones.
///
/// # Time Complexity
///
/// | Operation            | Complexity |
/// |----------------------|------------|
/// | `new`, `clone`       | O(1)       |
/// | `get`, `contains_key`| O(log N)   |
/// | `insert`, `remove`   | O(log N) (+ O(N) when shared) |
/// | `rank`, `select`     | O(log N)   |
/// | `floor`, `ceiling`   | O(log N)   |
/// | `min`/`max`          | O(log N)   |
/// | `len`, `is_empty`    | O(1)       |
///
/// # Examples
///
/// ```rust
/// use llrb_treemap::tree::TreeMap;
///
/// let mut map = TreeMap::new();
/// for (key, value) in [("B", 4), ("D", 6), ("E", -1), ("F", 13)] {
///     map.insert(key, value);
/// }
///
/// assert_eq!(map.rank(&"C"), 1);
/// assert_eq!(map.floor(&"L"), Some(&"F"));
/// assert_eq!(map.ceiling(&"A"), Some(&"B"));
/// ```
pub struct TreeMap<K, V> {
    /// Root node, shared between clones until one of them is written
    root: Option<ReferenceCounter<Node<K, V>>>,
    /// Identity of the current logical version
    version: Version,
}

impl<K, V> TreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, String> = TreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            version: Version::next(),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        size(self.root_node())
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        statistics::height(self.root_node())
    }

    pub(crate) fn root_node(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Wraps an already balanced node graph as a fresh version.
    pub(crate) fn from_root(root: Option<Node<K, V>>) -> Self {
        Self {
            root: root.map(ReferenceCounter::new),
            version: Version::next(),
        }
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, &str> = [(3, "three"), (1, "one")].into_iter().collect();
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root_node()
            .map(Node::min_node)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the maximum key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root_node()
            .map(Node::max_node)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the minimum key.
    #[must_use]
    pub fn min_key(&self) -> Option<&K> {
        self.min().map(|(key, _)| key)
    }

    /// Returns the maximum key.
    #[must_use]
    pub fn max_key(&self) -> Option<&K> {
        self.max().map(|(key, _)| key)
    }

    /// Returns the entry at the 0-based in-order `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()` (including on an empty map).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<&str, i32> =
    ///     [("A", 10), ("B", 20), ("C", 15), ("D", 7), ("E", 1)].into_iter().collect();
    /// assert_eq!(map.select(0), (&"A", &10));
    /// assert_eq!(map.select(4), (&"E", &1));
    /// ```
    #[must_use]
    pub fn select(&self, position: usize) -> (&K, &V) {
        let len = self.len();
        let Some(node) = statistics::select(self.root_node(), position) else {
            panic!("select position {position} out of range for map of length {len}");
        };
        (&node.key, &node.value)
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// The iterator is double-ended: `.rev()` walks in descending order.
    #[must_use]
    pub fn iter(&self) -> TreeMapIterator<'_, K, V> {
        TreeMapIterator::new(self.root_node())
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Checks every structural invariant of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. A map built only
    /// through this crate's API never fails validation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// let stats = map.validate().unwrap();
    /// assert_eq!(stats.len, 100);
    /// ```
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation>
    where
        K: Ord,
    {
        validate::validate(self.root_node())
    }

    // =========================================================================
    // Index Operations
    // =========================================================================

    /// Index of the minimum entry; equal to [`Self::end_index`] when empty.
    #[must_use]
    pub fn start_index(&self) -> TreeIndex {
        TreeIndex::start(self.root_node(), self.version)
    }

    /// The past-the-end index.
    #[must_use]
    pub const fn end_index(&self) -> TreeIndex {
        TreeIndex::end(self.version)
    }

    /// Returns the index following `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale, belongs to another map, or is the end
    /// index.
    #[must_use]
    pub fn index_after(&self, index: &TreeIndex) -> TreeIndex {
        let mut next = index.clone();
        self.form_index_after(&mut next);
        next
    }

    /// Advances `index` in place.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Self::index_after`].
    pub fn form_index_after(&self, index: &mut TreeIndex) {
        self.check_index(index);
        index.step_forward(self.root_node());
    }

    /// Returns the index preceding `index`. The index before the end index
    /// addresses the maximum.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale, belongs to another map, or is the start
    /// index.
    #[must_use]
    pub fn index_before(&self, index: &TreeIndex) -> TreeIndex {
        let mut previous = index.clone();
        self.form_index_before(&mut previous);
        previous
    }

    /// Moves `index` back in place.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Self::index_before`].
    pub fn form_index_before(&self, index: &mut TreeIndex) {
        self.check_index(index);
        index.step_backward(self.root_node());
    }

    /// Returns the entry addressed by `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale, belongs to another map, or is the end
    /// index.
    #[must_use]
    pub fn entry_at(&self, index: &TreeIndex) -> (&K, &V) {
        self.check_index(index);
        let Some(node) = index.resolve(self.root_node()) else {
            panic!("cannot read the entry at the end index");
        };
        (&node.key, &node.value)
    }

    /// Compares two indices of this map by in-order position.
    ///
    /// # Panics
    ///
    /// Panics if either index is stale or belongs to another map.
    #[must_use]
    pub fn compare_indices(&self, first: &TreeIndex, second: &TreeIndex) -> Ordering {
        self.check_index(first);
        self.check_index(second);
        first.cmp(second)
    }

    /// Panics unless `index` was taken from the current version of this map.
    fn check_index(&self, index: &TreeIndex) {
        assert!(
            index.version() == self.version,
            "TreeIndex is stale or belongs to a different map"
        );
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::find(self.root_node(), key).map(|node| &node.value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::find(self.root_node(), key).map(|node| (&node.key, &node.value))
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::find(self.root_node(), key).is_some()
    }

    /// Returns the number of keys strictly less than `key`.
    ///
    /// `key` does not need to be present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = [(10, ()), (20, ()), (30, ())].into_iter().collect();
    /// assert_eq!(map.rank(&5), 0);
    /// assert_eq!(map.rank(&20), 1);
    /// assert_eq!(map.rank(&25), 2);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::rank(self.root_node(), key)
    }

    /// Returns the largest key less than or equal to `key`.
    #[must_use]
    pub fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::floor(self.root_node(), key).map(|node| &node.key)
    }

    /// Returns the smallest key greater than or equal to `key`.
    #[must_use]
    pub fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        statistics::ceiling(self.root_node(), key).map(|node| &node.key)
    }

    /// Returns the number of keys within `range`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
    /// assert_eq!(map.count_in_range(3..7), 4);
    /// assert_eq!(map.count_in_range(..=2), 3);
    /// ```
    #[must_use]
    pub fn count_in_range<Q, R>(&self, range: R) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        statistics::count_in_range(self.root_node(), &range)
    }

    /// Returns an iterator over the entries within `range`, in ascending
    /// key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let keys: Vec<&i32> = map.range(2..).map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&2, &3]);
    /// ```
    #[must_use]
    pub fn range<Q, R>(&self, range: R) -> TreeMapRangeIterator<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        TreeMapRangeIterator::new(self.root_node(), &range)
    }

    /// Returns the index of the entry for `key`, if present.
    #[must_use]
    pub fn index_of<Q>(&self, key: &Q) -> Option<TreeIndex>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Path::new();
        let mut node = self.root_node();
        while let Some(current) = node {
            match key.cmp(current.key.borrow()) {
                Ordering::Less => {
                    path.push(Direction::Left);
                    node = current.left_node();
                }
                Ordering::Greater => {
                    path.push(Direction::Right);
                    node = current.right_node();
                }
                Ordering::Equal => return Some(TreeIndex::at(path, self.version)),
            }
        }
        None
    }
}

// =============================================================================
// Mutating Operations
// =============================================================================

impl<K: Clone + Ord, V: Clone> TreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    /// Takes unique ownership of the node graph, deep-cloning it when another
    /// handle still shares it.
    fn take_unique_root(&mut self) -> Option<Box<Node<K, V>>> {
        self.root.take().map(|root| {
            let node = ReferenceCounter::try_unwrap(root).unwrap_or_else(|shared| {
                tracing::trace!(len = shared.count, "cloning shared tree before write");
                Node::clone(&shared)
            });
            Box::new(node)
        })
    }

    /// Runs `operation` on a uniquely owned root slot and starts a new
    /// version, whatever the operation returns.
    fn mutate<R>(&mut self, operation: impl FnOnce(&mut Option<Box<Node<K, V>>>) -> R) -> R {
        let mut slot = self.take_unique_root();
        let result = operation(&mut slot);
        self.root = slot.map(|node| ReferenceCounter::new(*node));
        self.version = Version::next();
        result
    }

    /// Inserts a key-value pair, returning the value previously stored under
    /// the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.get(&1), Some(&"ONE"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let result = self.mutate(|slot| {
            engine::insert(slot, key, value, |stored, value| {
                Ok::<_, std::convert::Infallible>(Some(mem::replace(stored, value)))
            })
        });
        match result {
            Ok(displaced) => displaced,
            Err(never) => match never {},
        }
    }

    /// Inserts a key-value pair; when the key is present the stored value
    /// becomes `combine(&stored, value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let mut counts = TreeMap::new();
    /// for word in ["a", "b", "a"] {
    ///     counts.insert_with(word, 1, |stored, new| stored + new);
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// ```
    pub fn insert_with<F>(&mut self, key: K, value: V, combine: F)
    where
        F: FnOnce(&V, V) -> V,
    {
        let result = self.try_insert_with(key, value, |stored, value| {
            Ok::<_, std::convert::Infallible>(combine(stored, value))
        });
        if let Err(never) = result {
            match never {}
        }
    }

    /// Fallible form of [`Self::insert_with`].
    ///
    /// # Errors
    ///
    /// Returns the error produced by `combine`. The map is left as it was
    /// before the call, except that its version changes.
    pub fn try_insert_with<F, E>(&mut self, key: K, value: V, combine: F) -> Result<(), E>
    where
        F: FnOnce(&V, V) -> Result<V, E>,
    {
        self.mutate(|slot| {
            engine::insert(slot, key, value, |stored, value| {
                *stored = combine(&*stored, value)?;
                Ok(None)
            })
        })
        .map(|_| ())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Counts as a mutating call: the version changes even when the key is
    /// absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.version = Version::next();
        let root = self.root.as_mut()?;
        if ReferenceCounter::strong_count(root) > 1 {
            tracing::trace!(len = root.count, "cloning shared tree before write");
        }
        statistics::find_mut(Some(ReferenceCounter::make_mut(root)), key)
    }

    /// Removes a key from the map, returning its value.
    ///
    /// Removing an absent key stores nothing new but still starts a new
    /// version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::singleton(1, "one");
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.mutate(|slot| engine::remove(slot, key))
    }

    /// Removes and returns the entry with the minimum key.
    pub fn remove_min(&mut self) -> Option<(K, V)> {
        self.mutate(engine::remove_min)
    }

    /// Removes and returns the entry with the maximum key.
    pub fn remove_max(&mut self) -> Option<(K, V)> {
        self.mutate(engine::remove_max)
    }

    /// Removes the entry addressed by `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is stale, belongs to another map, or is the end
    /// index.
    pub fn remove_at(&mut self, index: &TreeIndex) -> (K, V) {
        let key = self.entry_at(index).0.clone();
        match self.remove_entry(&key) {
            Some(entry) => entry,
            None => unreachable!("entry addressed by a current index is present"),
        }
    }

    /// Removes every entry.
    pub fn remove_all(&mut self) {
        self.root = None;
        self.version = Version::next();
    }

    /// Returns a copy that shares no storage with `self`, built with the
    /// given key and value copy functions. The copy has the same shape and
    /// colors as the original.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    /// use std::rc::Rc;
    ///
    /// let map: TreeMap<i32, Rc<String>> =
    ///     [(1, Rc::new("one".to_string()))].into_iter().collect();
    /// let deep = map.duplicate_with(|key| *key, |value| Rc::new(value.as_str().to_owned()));
    ///
    /// assert_eq!(deep.get(&1), map.get(&1));
    /// assert!(!Rc::ptr_eq(deep.get(&1).unwrap(), map.get(&1).unwrap()));
    /// ```
    #[must_use]
    pub fn duplicate_with<F, G>(&self, mut key_function: F, mut value_function: G) -> Self
    where
        F: FnMut(&K) -> K,
        G: FnMut(&V) -> V,
    {
        Self::from_root(
            self.root_node()
                .map(|root| root.duplicate_with(&mut key_function, &mut value_function)),
        )
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for TreeMap<K, V> {
    /// Shares the node graph; O(1).
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            version: self.version,
        }
    }
}

impl<K, V> Default for TreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Collects pairs; a later value replaces an earlier one for the same key.
impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Clone + Ord, V: Clone> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Clone, V: Clone> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = TreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        TreeMapIntoIterator::new(self.root)
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = TreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        let same_root = match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };
        same_root || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<K: Eq, V: Eq> Eq for TreeMap<K, V> {}

/// Computes a hash value for this tree map.
///
/// The hash is computed by first hashing the length, then hashing each
/// (key, value) pair in key order, so equal maps hash equally regardless of
/// the order in which entries were inserted.
impl<K: Hash, V: Hash> Hash for TreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn letters(pairs: &[(&'static str, i32)]) -> TreeMap<&'static str, i32> {
        pairs.iter().copied().collect()
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_treemap() {
        let map: TreeMap<i32, String> = TreeMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    #[rstest]
    fn test_display_multiple_elements_sorted() {
        let map = letters(&[("c", 3), ("a", 1), ("b", 2)]);
        assert_eq!(format!("{map}"), "{a: 1, b: 2, c: 3}");
        assert_eq!(format!("{map:?}"), r#"{"a": 1, "b": 2, "c": 3}"#);
    }

    // =========================================================================
    // Copy-on-Write Tests
    // =========================================================================

    #[rstest]
    fn test_clone_shares_root() {
        let map = letters(&[("a", 1), ("b", 2)]);
        let copy = map.clone();
        let (Some(left), Some(right)) = (&map.root, &copy.root) else {
            panic!("both maps should have a root");
        };
        assert!(ReferenceCounter::ptr_eq(left, right));
        assert_eq!(ReferenceCounter::strong_count(left), 2);
    }

    #[rstest]
    fn test_write_to_clone_detaches_storage() {
        let map = letters(&[("a", 1), ("b", 2)]);
        let mut copy = map.clone();
        copy.insert("c", 3);

        let (Some(left), Some(right)) = (&map.root, &copy.root) else {
            panic!("both maps should have a root");
        };
        assert!(!ReferenceCounter::ptr_eq(left, right));
        assert_eq!(ReferenceCounter::strong_count(left), 1);
        assert_eq!(map.len(), 2);
        assert_eq!(copy.len(), 3);
    }

    #[rstest]
    fn test_get_mut_on_clone_leaves_original() {
        let map = letters(&[("a", 1)]);
        let mut copy = map.clone();
        *copy.get_mut(&"a").unwrap() = 100;
        assert_eq!(map.get(&"a"), Some(&1));
        assert_eq!(copy.get(&"a"), Some(&100));
    }

    #[rstest]
    fn test_clone_keeps_version_until_written() {
        let map = letters(&[("a", 1)]);
        let mut copy = map.clone();
        assert_eq!(map.version, copy.version);
        copy.remove(&"zzz");
        assert_ne!(map.version, copy.version);
    }

    // =========================================================================
    // Version Tests
    // =========================================================================

    #[rstest]
    #[case::insert(|map: &mut TreeMap<&'static str, i32>| { map.insert("x", 0); })]
    #[case::remove_absent(|map: &mut TreeMap<&'static str, i32>| { map.remove(&"zzz"); })]
    #[case::remove_min(|map: &mut TreeMap<&'static str, i32>| { map.remove_min(); })]
    #[case::remove_max(|map: &mut TreeMap<&'static str, i32>| { map.remove_max(); })]
    #[case::remove_all(|map: &mut TreeMap<&'static str, i32>| map.remove_all())]
    #[case::get_mut_absent(|map: &mut TreeMap<&'static str, i32>| { map.get_mut(&"zzz"); })]
    fn test_every_mutating_call_starts_new_version(
        #[case] operation: fn(&mut TreeMap<&'static str, i32>),
    ) {
        let mut map = letters(&[("a", 1), ("b", 2)]);
        let before = map.version;
        operation(&mut map);
        assert_ne!(map.version, before);
    }

    // =========================================================================
    // Order Statistics Tests
    // =========================================================================

    #[rstest]
    fn test_min_and_max_on_empty_map() {
        let map: TreeMap<i32, i32> = TreeMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max_key(), None);
    }

    #[rstest]
    #[should_panic(expected = "out of range")]
    fn test_select_on_empty_map_panics() {
        let map: TreeMap<i32, i32> = TreeMap::new();
        let _ = map.select(0);
    }

    #[rstest]
    #[should_panic(expected = "out of range")]
    fn test_select_past_end_panics() {
        let map = letters(&[("a", 1)]);
        let _ = map.select(1);
    }

    #[rstest]
    fn test_try_insert_with_error_keeps_value() {
        let mut map = letters(&[("a", 1)]);
        let result = map.try_insert_with("a", 2, |_, _| Err("conflict"));
        assert_eq!(result, Err("conflict"));
        assert_eq!(map.get(&"a"), Some(&1));
        assert!(map.validate().is_ok());
    }

    #[rstest]
    fn test_remove_at_removes_addressed_entry() {
        let mut map = letters(&[("a", 1), ("b", 2), ("c", 3)]);
        let index = map.index_of(&"b").unwrap();
        assert_eq!(map.remove_at(&index), ("b", 2));
        assert_eq!(map.len(), 2);
    }

    #[rstest]
    fn test_equal_maps_built_in_different_orders() {
        let first = letters(&[("a", 1), ("b", 2), ("c", 3)]);
        let second = letters(&[("c", 3), ("b", 2), ("a", 1)]);
        assert_eq!(first, second);
        assert_ne!(first, letters(&[("a", 1), ("b", 2)]));
    }
}
