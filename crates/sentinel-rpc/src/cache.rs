use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Cache LRU de traces serializados, com TTL por entrada
pub struct TraceCache {
    entries: RwLock<lru::LruCache<String, CacheEntry>>,
    ttl: Duration,
}

struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

/// Estatísticas do cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub capacity: usize,
}

impl TraceCache {
    /// Cria um cache com capacidade e TTL dados; capacidade zero vira 1
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: RwLock::new(lru::LruCache::new(capacity)),
            ttl,
        }
    }

    /// Obtém um trace ainda válido; entradas expiradas são removidas
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.write();
        let now = Instant::now();

        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.data.clone());
            }
        } else {
            return None;
        }

        entries.pop(key);
        None
    }

    /// Insere um trace, descartando antes as entradas expiradas mais antigas
    pub fn insert(&self, key: String, data: Vec<u8>) {
        let mut entries = self.entries.write();
        let now = Instant::now();

        while let Some((_, oldest)) = entries.peek_lru() {
            if oldest.expires_at > now {
                break;
            }
            entries.pop_lru();
        }

        entries.put(
            key,
            CacheEntry {
                data,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let now = Instant::now();

        CacheStats {
            total_entries: entries.len(),
            expired_entries: entries.iter().filter(|(_, e)| e.expires_at <= now).count(),
            capacity: entries.cap().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_bounds_the_number_of_entries() {
        let cache = TraceCache::new(3, Duration::from_secs(60));
        for i in 0..10 {
            cache.insert(format!("traces_{i}"), vec![i as u8]);
        }

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.capacity, 3);
        assert_eq!(cache.get("traces_0"), None);
        assert_eq!(cache.get("traces_9"), Some(vec![9]));
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = TraceCache::new(1000, Duration::from_millis(1));
        for i in 0..500 {
            cache.insert(format!("traces_{i}"), vec![0]);
        }
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get("traces_0"), None);
        cache.insert("traces_new".to_string(), vec![1]);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.expired_entries, 0);
    }

    #[test]
    fn zero_capacity_keeps_one_entry() {
        let cache = TraceCache::new(0, Duration::from_secs(60));
        cache.insert("a".to_string(), vec![1]);
        cache.insert("b".to_string(), vec![2]);

        assert_eq!(cache.stats().total_entries, 1);
        assert_eq!(cache.get("b"), Some(vec![2]));
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TraceCache::new(8, Duration::from_secs(60));
        cache.insert("a".to_string(), vec![1]);
        cache.clear();

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().total_entries, 0);
    }
}
