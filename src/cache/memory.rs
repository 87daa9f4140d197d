//! Ephemeral in-process cache tier
//!
//! A process-wide map from request-shaped keys to JSON values. Entries are
//! lazily treated as expired at read time; nothing is ever swept. The cache
//! is constructed once at the application root and injected wherever it is
//! needed, never reached through a global.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// A single cached value with its write timestamp
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    stored_at: DateTime<Utc>,
}

/// Ephemeral cache tier shared by all in-flight requests.
///
/// Writes are last-write-wins: every value is a deterministic function of
/// its key, so concurrent writers cannot disagree about content.
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create a cache with the given entry lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a live entry, or `None` on miss or expiry
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_entry(key).map(|(value, _)| value)
    }

    /// Get a live entry together with its write timestamp
    pub fn get_entry(&self, key: &str) -> Option<(String, DateTime<Utc>)> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let entry = entries.get(key)?;

        let age = Utc::now().signed_duration_since(entry.stored_at);
        if age.to_std().map(|age| age > self.ttl).unwrap_or(true) {
            return None;
        }

        Some((entry.value.clone(), entry.stored_at))
    }

    /// Store a value under `key` with the current timestamp, replacing any
    /// previous entry
    pub fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Utc::now(),
            },
        );
    }

    /// Typed read: deserialize a live entry, treating decode failures as
    /// misses
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_str(&value).ok())
    }

    /// Typed write: silently skipped if the value does not serialize
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            self.set(key, json);
        }
    }

    /// Number of entries currently held, live or expired
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_stored_value() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new(Duration::from_secs(0));
        cache.set("k", "v".to_string());
        // Zero TTL: any measurable age is past the deadline
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("k"), None);
        // Expired entries are not swept, only ignored
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", "old".to_string());
        cache.set("k", "new".to_string());
        assert_eq!(cache.get("k"), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let files = vec!["README.md".to_string(), "src/main.rs".to_string()];
        cache.set_json("files", &files);

        let loaded: Vec<String> = cache.get_json("files").unwrap();
        assert_eq!(loaded, files);
    }

    #[test]
    fn test_get_json_decode_failure_is_a_miss() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", "not json".to_string());
        assert!(cache.get_json::<Vec<String>>("k").is_none());
    }

    #[test]
    fn test_get_entry_exposes_timestamp() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let before = Utc::now();
        cache.set("k", "v".to_string());

        let (_, stored_at) = cache.get_entry("k").unwrap();
        assert!(stored_at >= before);
        assert!(stored_at <= Utc::now());
    }
}
