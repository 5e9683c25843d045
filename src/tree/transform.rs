//! Construction helpers and higher-order transforms.
//!
//! Everything here is a composition of the core operations of
//! [`TreeMap`]: lookups, `insert`, `try_insert_with` and in-order iteration.

use std::convert::Infallible;

use super::TreeMap;

fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<K: Clone + Ord, V: Clone> TreeMap<K, V> {
    /// Builds a map from pairs whose keys must all be distinct.
    ///
    /// # Panics
    ///
    /// Panics if a key appears more than once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map = TreeMap::from_unique_pairs([(2, "b"), (1, "a")]);
    /// assert_eq!(map.min_key(), Some(&1));
    /// ```
    #[must_use]
    pub fn from_unique_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (position, (key, value)) in pairs.into_iter().enumerate() {
            assert!(
                map.insert(key, value).is_none(),
                "from_unique_pairs: duplicate key at position {position}"
            );
        }
        map
    }

    /// Builds a map from pairs, resolving duplicate keys with
    /// `combine(&stored, new)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let totals = TreeMap::from_pairs_with([("a", 1), ("b", 2), ("a", 3)], |stored, new| stored + new);
    /// assert_eq!(totals.get(&"a"), Some(&4));
    /// ```
    #[must_use]
    pub fn from_pairs_with<I, F>(pairs: I, mut combine: F) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(&V, V) -> V,
    {
        unwrap_infallible(Self::try_from_pairs_with(pairs, |stored, new| {
            Ok(combine(stored, new))
        }))
    }

    /// Fallible form of [`Self::from_pairs_with`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `combine`.
    pub fn try_from_pairs_with<I, F, E>(pairs: I, combine: F) -> Result<Self, E>
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(&V, V) -> Result<V, E>,
    {
        let mut map = Self::new();
        map.try_merge(pairs, combine)?;
        Ok(map)
    }

    /// Merges `pairs` into the map, resolving keys already present with
    /// `combine(&stored, new)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::from_unique_pairs([(1, 10), (2, 20)]);
    /// map.merge([(2, 5), (3, 30)], |stored, new| stored + new);
    /// assert_eq!(map.get(&2), Some(&25));
    /// assert_eq!(map.len(), 3);
    /// ```
    pub fn merge<I, F>(&mut self, pairs: I, mut combine: F)
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(&V, V) -> V,
    {
        unwrap_infallible(self.try_merge(pairs, |stored, new| Ok(combine(stored, new))));
    }

    /// Fallible form of [`Self::merge`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `combine`. Pairs merged before
    /// the failing one stay merged; the map is not rolled back.
    pub fn try_merge<I, F, E>(&mut self, pairs: I, mut combine: F) -> Result<(), E>
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(&V, V) -> Result<V, E>,
    {
        for (key, value) in pairs {
            self.try_insert_with(key, value, &mut combine)?;
        }
        Ok(())
    }

    /// Returns a new map holding the entries of `self` merged with `pairs`.
    #[must_use]
    pub fn merging<I, F>(&self, pairs: I, combine: F) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(&V, V) -> V,
    {
        let mut merged = self.clone();
        merged.merge(pairs, combine);
        merged
    }

    /// Returns a map with the entries for which `predicate` returns `true`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iter()
            .filter(|(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Clone + Ord, T: Clone> TreeMap<K, Vec<T>> {
    /// Groups `values` under the key computed by `key_function`, keeping
    /// the input order within each group.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let groups = TreeMap::grouping(["apple", "avocado", "banana"], |word| word.as_bytes()[0]);
    /// assert_eq!(groups.get(&b'a'), Some(&vec!["apple", "avocado"]));
    /// ```
    #[must_use]
    pub fn grouping<I, F>(values: I, mut key_function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> K,
    {
        let mut groups = Self::new();
        for value in values {
            let key = key_function(&value);
            match groups.get_mut(&key) {
                Some(group) => group.push(value),
                None => {
                    groups.insert(key, vec![value]);
                }
            }
        }
        groups
    }
}

impl<K: Clone + Ord, V> TreeMap<K, V> {
    /// Applies a function to all values, keeping keys and tree shape.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map = TreeMap::from_unique_pairs([(1, 10), (2, 20)]);
    /// let doubled = map.map_values(|value| value * 2);
    /// assert_eq!(doubled.get(&2), Some(&40));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> TreeMap<K, W>
    where
        F: FnMut(&V) -> W,
    {
        let mut copy_key = K::clone;
        TreeMap::from_root(
            self.root_node()
                .map(|root| root.duplicate_with(&mut copy_key, &mut transform)),
        )
    }

    /// Fallible form of [`Self::map_values`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `transform`.
    pub fn try_map_values<W, F, E>(&self, mut transform: F) -> Result<TreeMap<K, W>, E>
    where
        W: Clone,
        F: FnMut(&V) -> Result<W, E>,
    {
        let mut mapped = TreeMap::new();
        for (key, value) in self {
            mapped.insert(key.clone(), transform(value)?);
        }
        Ok(mapped)
    }

    /// Applies a function to all values, dropping the entries for which it
    /// returns `None`.
    #[must_use]
    pub fn compact_map_values<W, F>(&self, mut transform: F) -> TreeMap<K, W>
    where
        W: Clone,
        F: FnMut(&V) -> Option<W>,
    {
        self.iter()
            .filter_map(|(key, value)| transform(value).map(|mapped| (key.clone(), mapped)))
            .collect()
    }
}
