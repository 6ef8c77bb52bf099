// In-memory translation cache using DashMap
use dashmap::DashMap;

const DEFAULT_CAPACITY: usize = 4096;

/// Thread-safe cache of recent translations, keyed by input text
///
/// Keyboard input repeats the same short strings constantly, so hits skip
/// the phrase table entirely. When full the cache is simply emptied.
pub struct PhraseCache {
    map: DashMap<String, String>,
    capacity: usize,
}

impl PhraseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: String, value: String) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            self.map.clear();
        }
        self.map.insert(key, value);
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for PhraseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
