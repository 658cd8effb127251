use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::pubchem::CompoundRecord;

/// Memoizes successful lookups by the exact drug name. Implementations only
/// live as long as the process, nothing is persisted.
pub trait LookupCache {
    fn get(&self, name: &str) -> Option<CompoundRecord>;

    fn insert(&self, name: &str, record: &CompoundRecord);
}

/// never stores anything, so every name goes to the network
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl LookupCache for NoCache {
    fn get(&self, _name: &str) -> Option<CompoundRecord> {
        None
    }

    fn insert(&self, _name: &str, _record: &CompoundRecord) {}
}

/// An in-memory map shared between clones, so one instance can serve every
/// run in the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(Arc<Mutex<HashMap<String, CompoundRecord>>>);

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LookupCache for MemoryCache {
    fn get(&self, name: &str) -> Option<CompoundRecord> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn insert(&self, name: &str, record: &CompoundRecord) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caffeine() -> CompoundRecord {
        CompoundRecord {
            cid: Some(2519),
            ..Default::default()
        }
    }

    #[test]
    fn no_cache_forgets() {
        NoCache.insert("Caffeine", &caffeine());
        assert_eq!(NoCache.get("Caffeine"), None);
    }

    #[test]
    fn exact_keys() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());
        cache.insert("Caffeine", &caffeine());
        assert_eq!(cache.get("Caffeine"), Some(caffeine()));
        assert_eq!(cache.get("caffeine"), None);
        assert_eq!(cache.get("Caffeine "), None);
    }

    #[test]
    fn clones_share_entries() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        other.insert("Caffeine", &caffeine());
        assert_eq!(cache.get("Caffeine"), Some(caffeine()));
        assert_eq!(cache.len(), 1);
    }
}
