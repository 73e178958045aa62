//! In-memory TTL cache for verified IČO records.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::IcoRecord;

struct CacheEntry {
    record: IcoRecord,
    inserted_at: Instant,
}

/// Cache keyed by normalized IČO. Entries expire independently, TTL from
/// insertion time; expiry is lazy, on read. Losing the cache only costs
/// latency: misses re-derive truth from the registry.
pub struct IcoCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl IcoCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(ttl: Duration) -> IcoCache {
        IcoCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, ico: &str) -> Option<IcoRecord> {
        match self.entries.get(ico) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.record.clone()),
            Some(_) => {
                self.entries.remove(ico);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, ico: &str, record: IcoRecord) {
        self.entries.insert(
            ico.to_string(),
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for IcoCache {
    fn default() -> Self {
        IcoCache::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ico: &str) -> IcoRecord {
        IcoRecord::format_only(ico.to_string())
    }

    #[test]
    fn stores_and_returns_entries() {
        let mut cache = IcoCache::default();
        assert_eq!(cache.get("12345678"), None);

        cache.insert("12345678", record("12345678"));
        assert_eq!(cache.get("12345678").unwrap().ico, "12345678");
        assert_eq!(cache.get("87654321"), None);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut cache = IcoCache::new(Duration::ZERO);
        cache.insert("12345678", record("12345678"));
        assert_eq!(cache.get("12345678"), None);
        // Expired entry is removed on read
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = IcoCache::default();
        cache.insert("12345678", record("12345678"));
        cache.insert("87654321", record("87654321"));

        cache.clear();
        assert_eq!(cache.get("12345678"), None);
        assert_eq!(cache.get("87654321"), None);
    }
}
