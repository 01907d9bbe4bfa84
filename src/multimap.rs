use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A map from keys to deduplicated value sets. Shared by the resolver's
/// per-project result buckets; kept generic because the dedup-on-insert and
/// merge behavior is what matters, not the element types.
#[derive(Debug, Clone)]
pub struct MultiValueMap<K, V> {
    inner: HashMap<K, HashSet<V>>,
}

impl<K: Eq + Hash, V: Eq + Hash> MultiValueMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert `value` under `key`. Returns `true` if the value was not
    /// already present under that key.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Whether `value` is already recorded under `key`.
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.inner.get(key).is_some_and(|set| set.contains(value))
    }

    pub fn get(&self, key: &K) -> Option<&HashSet<V>> {
        self.inner.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &HashSet<V>)> {
        self.inner.iter()
    }

    /// Total number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.inner.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Move every entry of `other` into `self`, deduplicating per key.
    pub fn merge(&mut self, other: Self) {
        for (key, values) in other.inner {
            self.inner.entry(key).or_default().extend(values);
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Default for MultiValueMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
