//! Search result caching with LRU eviction

use crate::model::SearchResult;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Results depend only on the corpus snapshot, the tokens and the limit.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct SearchKey {
    pub generation: u64,
    pub tokens: Vec<String>,
    pub limit: usize,
}

impl SearchKey {
    pub fn new(generation: u64, tokens: Vec<String>, limit: usize) -> Self {
        Self { generation, tokens, limit }
    }
}

pub struct SearchCache {
    cache: Mutex<LruCache<SearchKey, Arc<Vec<SearchResult>>>>,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { cache: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn get(&self, key: &SearchKey) -> Option<Arc<Vec<SearchResult>>> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(key).map(Arc::clone)
    }

    pub fn put(&self, key: SearchKey, results: Arc<Vec<SearchResult>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, results);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// `(entries, capacity)`
    pub fn stats(&self) -> (usize, usize) {
        match self.cache.lock() {
            Ok(cache) => (cache.len(), cache.cap().get()),
            Err(_) => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(generation: u64, token: &str) -> SearchKey {
        SearchKey::new(generation, vec![token.to_string()], 200)
    }

    #[test]
    fn test_get_put() {
        let cache = SearchCache::new(4);
        assert!(cache.get(&key(1, "god")).is_none());

        cache.put(key(1, "god"), Arc::new(Vec::new()));
        assert!(cache.get(&key(1, "god")).is_some());
        assert!(cache.get(&key(2, "god")).is_none());
        assert_eq!(cache.stats(), (1, 4));
    }

    #[test]
    fn test_evicts_least_recent() {
        let cache = SearchCache::new(2);
        cache.put(key(1, "a"), Arc::new(Vec::new()));
        cache.put(key(1, "b"), Arc::new(Vec::new()));
        cache.get(&key(1, "a"));
        cache.put(key(1, "c"), Arc::new(Vec::new()));

        assert!(cache.get(&key(1, "a")).is_some());
        assert!(cache.get(&key(1, "b")).is_none());
        assert!(cache.get(&key(1, "c")).is_some());
    }

    #[test]
    fn test_clear_and_zero_capacity() {
        let cache = SearchCache::new(0);
        assert_eq!(cache.stats(), (0, 1));
        cache.put(key(1, "a"), Arc::new(Vec::new()));
        cache.clear();
        assert_eq!(cache.stats(), (0, 1));
    }
}
