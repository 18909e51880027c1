use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Lifetime of a cached upstream response (5 minutes).
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used to exercise expiry without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// In-memory response cache with a fixed TTL.
///
/// Expired entries are dropped lazily, on the next `get` for their key. There
/// is no size bound and no background sweep, so `size()` may count entries
/// that are already stale.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: CACHE_TTL,
            clock,
        }
    }

    /// Return the value stored under `key` unless it has outlived the TTL.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();

        let entry = self.entries.get(key)?;
        if !self.is_expired(&entry, now) {
            tracing::debug!(key, "Cache hit");
            return Some(entry.value.clone());
        }

        // Release the shard before taking it again for removal.
        drop(entry);
        // A fresh `set` may have landed in between.
        self.entries.remove_if(key, |_, entry| self.is_expired(entry, now));
        tracing::debug!(key, "Cache expired");
        None
    }

    /// Store `value`, replacing whatever was there.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let stored_at = self.clock.now();
        tracing::debug!(key = %key, "Cache set");
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    pub fn clear(&self) {
        self.entries.clear();
        tracing::debug!("Cache cleared");
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) > self.ttl
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
