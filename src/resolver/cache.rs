use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Insertion-ordered map with oldest-first eviction
///
/// Reads do not refresh an entry's age. Re-inserting an existing key replaces
/// the value but keeps its original position.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> Default for FifoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> FifoCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the `count` oldest entries
    pub fn evict_oldest(&mut self, count: usize) {
        for _ in 0..count {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&key);
        }
    }

    /// Evict `evict` oldest entries if the cache holds more than `limit`
    ///
    /// Returns how many entries were dropped.
    pub fn trim(&mut self, limit: usize, evict: usize) -> usize {
        if self.len() <= limit {
            return 0;
        }
        let before = self.len();
        self.evict_oldest(evict);
        before - self.len()
    }
}
