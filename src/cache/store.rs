//! In-memory TTL cache for search results
//!
//! Replaces framework-level memoization with an explicit component: a
//! mapping from (operation, argument) keys to serialized values plus an
//! expiry timestamp. The clock is pluggable so expiry is testable without
//! sleeping.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default entry lifetime in minutes
const DEFAULT_TTL_MINUTES: i64 = 60;

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One stored entry: the serialized value and when it stops being fresh
struct Entry {
    payload: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// TTL-bounded in-memory cache keyed by (operation, argument)
///
/// Values are stored serialized and handed back as fresh deserialized
/// copies, so cached results behave as immutable snapshots. Safe for
/// concurrent use; clones share the same underlying store.
#[derive(Clone)]
pub struct CacheStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl CacheStore {
    /// Creates a store with the system clock and the default one-hour TTL
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), DEFAULT_TTL_MINUTES)
    }

    /// Creates a store with a custom clock and TTL in minutes
    pub fn with_clock(clock: Arc<dyn Clock>, ttl_minutes: i64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Builds a cache key from an operation name and its argument
    ///
    /// The argument is normalized so "Paris" and " paris " share an entry.
    pub fn key(operation: &str, argument: &str) -> String {
        format!(
            "{}_{}",
            operation,
            argument.trim().to_lowercase().replace(' ', "_")
        )
    }

    /// Returns a fresh copy of an unexpired entry, or `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if self.clock.now() > entry.expires_at {
            return None;
        }
        serde_json::from_value(entry.payload.clone()).ok()
    }

    /// Stores a value under the key with the configured TTL
    ///
    /// Values that fail to serialize are silently not cached; the cache is
    /// an optimization, never a source of truth.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(payload) = serde_json::to_value(value) else {
            return;
        };
        let now = self.clock.now();
        if let Ok(mut entries) = self.entries.lock() {
            // Drop entries that already lapsed while we hold the lock
            entries.retain(|_, e| now <= e.expires_at);
            entries.insert(
                key.to_string(),
                Entry {
                    payload,
                    expires_at: now + self.ttl,
                },
            );
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    /// Manually advanced clock for expiry tests
    #[derive(Default)]
    struct ManualClock {
        offset_minutes: AtomicI64,
    }

    impl ManualClock {
        fn advance_minutes(&self, minutes: i64) {
            self.offset_minutes.fetch_add(minutes, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            // A fixed epoch keeps the tests deterministic
            let base = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc);
            base + Duration::minutes(self.offset_minutes.load(Ordering::SeqCst))
        }
    }

    fn test_data() -> TestData {
        TestData {
            name: "paris".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let cache = CacheStore::new();
        let result: Option<TestData> = cache.get("missing");
        assert!(result.is_none());
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let cache = CacheStore::new();
        cache.put("city_snapshot_paris", &test_data());

        let cached: TestData = cache.get("city_snapshot_paris").expect("entry should exist");
        assert_eq!(cached, test_data());
    }

    #[test]
    fn test_get_returns_independent_copies() {
        let cache = CacheStore::new();
        cache.put("k", &test_data());

        let mut first: TestData = cache.get("k").expect("entry should exist");
        first.value = 999;

        let second: TestData = cache.get("k").expect("entry should exist");
        assert_eq!(second.value, 42, "mutating one copy must not affect the store");
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::default());
        let cache = CacheStore::with_clock(clock.clone(), 60);

        cache.put("k", &test_data());
        assert!(cache.get::<TestData>("k").is_some());

        clock.advance_minutes(59);
        assert!(cache.get::<TestData>("k").is_some());

        clock.advance_minutes(2);
        assert!(cache.get::<TestData>("k").is_none());
    }

    #[test]
    fn test_put_refreshes_expiry() {
        let clock = Arc::new(ManualClock::default());
        let cache = CacheStore::with_clock(clock.clone(), 60);

        cache.put("k", &test_data());
        clock.advance_minutes(45);
        cache.put("k", &test_data());
        clock.advance_minutes(45);

        // 90 minutes after the first put, 45 after the second
        assert!(cache.get::<TestData>("k").is_some());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let cache = CacheStore::new();
        cache.put("k", &test_data());
        cache.put(
            "k",
            &TestData {
                name: "lyon".to_string(),
                value: 7,
            },
        );

        let cached: TestData = cache.get("k").expect("entry should exist");
        assert_eq!(cached.name, "lyon");
        assert_eq!(cached.value, 7);
    }

    #[test]
    fn test_key_normalizes_argument() {
        assert_eq!(
            CacheStore::key("city_snapshot", "Paris"),
            "city_snapshot_paris"
        );
        assert_eq!(
            CacheStore::key("city_snapshot", "  New York "),
            "city_snapshot_new_york"
        );
        assert_eq!(
            CacheStore::key("city_snapshot", "paris"),
            CacheStore::key("city_snapshot", "PARIS"),
        );
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = CacheStore::new();
        let clone = cache.clone();

        cache.put("k", &test_data());
        let cached: Option<TestData> = clone.get("k");
        assert!(cached.is_some());
    }
}
