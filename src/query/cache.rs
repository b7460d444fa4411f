//! Ordered-map LRU cache for query-builder results, keyed by a hash of
//! `(graph_name, steps)` and storing the matched idents in result order.

use indexmap::IndexMap;

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct QueryCache {
    capacity: usize,
    entries: IndexMap<u64, Vec<String>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: IndexMap::new(),
        }
    }

    /// Move-to-front on hit: the entry is re-inserted at the back of
    /// the map, so the oldest (least recently used) entry is always
    /// at index 0.
    pub fn get(&mut self, key: u64) -> Option<Vec<String>> {
        let value = self.entries.shift_remove(&key)?;
        self.entries.insert(key, value.clone());
        Some(value)
    }

    pub fn put(&mut self, key: u64, value: Vec<String>) {
        if self.entries.contains_key(&key) {
            self.entries.shift_remove(&key);
        } else if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
