//! Boundary format: two parallel sequences, keys and values in key order.
//!
//! With the `serde` feature the map serializes as a struct with `keys` and
//! `values` fields. Decoding rejects sequences of different lengths and
//! repeated keys.

use crate::error::DecodeError;

use super::TreeMap;

impl<K: Clone + Ord, V: Clone> TreeMap<K, V> {
    /// Returns keys and values as two parallel vectors in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map = TreeMap::from_unique_pairs([(2, 'b'), (1, 'a')]);
    /// assert_eq!(map.to_keys_and_values(), (vec![1, 2], vec!['a', 'b']));
    /// ```
    #[must_use]
    pub fn to_keys_and_values(&self) -> (Vec<K>, Vec<V>) {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .unzip()
    }

    /// Rebuilds a map from parallel key and value sequences.
    ///
    /// The keys need not be sorted, but each must appear once.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::LengthMismatch`] if the sequences differ in length
    /// - [`DecodeError::DuplicateKey`] with the position of the first
    ///   repeated key
    ///
    /// # Examples
    ///
    /// ```rust
    /// use llrb_treemap::error::DecodeError;
    /// use llrb_treemap::tree::TreeMap;
    ///
    /// let map = TreeMap::try_from_keys_and_values(vec![3, 1], vec!["c", "a"]).unwrap();
    /// assert_eq!(map.min(), Some((&1, &"a")));
    ///
    /// let error = TreeMap::try_from_keys_and_values(vec![1, 1], vec!["a", "b"]).unwrap_err();
    /// assert_eq!(error, DecodeError::DuplicateKey { position: 1 });
    /// ```
    pub fn try_from_keys_and_values(keys: Vec<K>, values: Vec<V>) -> Result<Self, DecodeError> {
        if keys.len() != values.len() {
            let error = DecodeError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            };
            tracing::debug!(%error, "rejecting encoded tree map");
            return Err(error);
        }

        let mut map = Self::new();
        for (position, (key, value)) in keys.into_iter().zip(values).enumerate() {
            if map.insert(key, value).is_some() {
                let error = DecodeError::DuplicateKey { position };
                tracing::debug!(%error, "rejecting encoded tree map");
                return Err(error);
            }
        }
        Ok(map)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
struct KeySequence<'a, K, V>(&'a TreeMap<K, V>);

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V> serde::Serialize for KeySequence<'_, K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.keys())
    }
}

#[cfg(feature = "serde")]
struct ValueSequence<'a, K, V>(&'a TreeMap<K, V>);

#[cfg(feature = "serde")]
impl<K, V: serde::Serialize> serde::Serialize for ValueSequence<'_, K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.values())
    }
}

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for TreeMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut encoded = serializer.serialize_struct("TreeMap", 2)?;
        encoded.serialize_field("keys", &KeySequence(self))?;
        encoded.serialize_field("values", &ValueSequence(self))?;
        encoded.end()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename = "TreeMap")]
struct Encoded<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for TreeMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let Encoded { keys, values } =
            <Encoded<K, V> as serde::Deserialize>::deserialize(deserializer)?;
        Self::try_from_keys_and_values(keys, values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_keys_and_values_are_in_key_order() {
        let map: TreeMap<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
        let (keys, values) = map.to_keys_and_values();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(values, vec!['a', 'b', 'c']);
    }

    #[rstest]
    fn test_decode_restores_equal_map() {
        let map: TreeMap<i32, i32> = (0..40).map(|key| (key, -key)).collect();
        let (keys, values) = map.to_keys_and_values();
        let decoded = TreeMap::try_from_keys_and_values(keys, values).unwrap();
        assert_eq!(decoded, map);
        assert!(decoded.validate().is_ok());
    }

    #[rstest]
    #[case(vec![1, 2], vec!['a'], DecodeError::LengthMismatch { keys: 2, values: 1 })]
    #[case(vec![], vec!['a'], DecodeError::LengthMismatch { keys: 0, values: 1 })]
    #[case(vec![5, 4, 5], vec!['a', 'b', 'c'], DecodeError::DuplicateKey { position: 2 })]
    fn test_decode_rejects_malformed_input(
        #[case] keys: Vec<i32>,
        #[case] values: Vec<char>,
        #[case] expected: DecodeError,
    ) {
        assert_eq!(
            TreeMap::try_from_keys_and_values(keys, values).unwrap_err(),
            expected
        );
    }

    #[rstest]
    fn test_decode_empty_sequences() {
        let map = TreeMap::<i32, char>::try_from_keys_and_values(Vec::new(), Vec::new()).unwrap();
        assert!(map.is_empty());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_as_parallel_sequences() {
        let map: TreeMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"keys":["a","b"],"values":[1,2]}"#);
    }

    #[rstest]
    fn test_serialize_empty() {
        let map: TreeMap<i32, i32> = TreeMap::new();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"keys":[],"values":[]}"#
        );
    }

    #[rstest]
    fn test_deserialize_unsorted_keys() {
        let map: TreeMap<i32, String> =
            serde_json::from_str(r#"{"keys":[2,1],"values":["two","one"]}"#).unwrap();
        assert_eq!(map.min(), Some((&1, &"one".to_string())));
        assert!(map.validate().is_ok());
    }

    #[rstest]
    #[case(r#"{"keys":[1,2],"values":[1]}"#, "2 keys but 1 values")]
    #[case(r#"{"keys":[1,1],"values":[1,2]}"#, "position 1 is a duplicate")]
    fn test_deserialize_rejects_malformed_input(#[case] json: &str, #[case] message: &str) {
        let error = serde_json::from_str::<TreeMap<i32, i32>>(json).unwrap_err();
        assert!(
            error.to_string().contains(message),
            "unexpected error: {error}"
        );
    }
}
