use std::{hash::Hash, num::NonZeroUsize, sync::Mutex};

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;

pub const DEFAULT_TTL_DAYS: i64 = 7;
pub const DEFAULT_CAPACITY: usize = 512;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// LRU-bounded map whose entries also expire after a time-to-live.
pub struct TtlCache<K: Hash + Eq, V, C: Clock = SystemClock> {
    entries: LruCache<K, Entry<V>>,
    ttl: Duration,
    clock: C,
}

impl<K: Hash + Eq + Clone, V: Clone> TtlCache<K, V, SystemClock> {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, SystemClock)
    }
}

impl<K: Hash + Eq + Clone, V: Clone, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(capacity: NonZeroUsize, ttl: Duration, clock: C) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
            clock,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let fresh = self
            .entries
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));
        match fresh {
            Some(Some(value)) => Some(value),
            Some(None) => {
                self.entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&mut self, key: K, value: V) {
        self.set_with_ttl(key, value, self.ttl);
    }

    pub fn set_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.put(key, Entry { value, expires_at });
    }

    pub fn evict(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key).map(|entry| entry.value)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let stale: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
