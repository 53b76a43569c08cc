//! TTL cache with bounded size and single-flight misses

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::{debug, trace};

use super::CacheKey;

/// A stored value with its freshness metadata
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
    /// Insertion order, used to pick the eviction victim
    sequence: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > self.ttl
    }
}

/// Per-key lock shared by every caller currently resolving that key
struct FlightSlot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Live entries at the time of the snapshot
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed to make room for a new one
    pub evictions: u64,
}

/// In-memory cache keyed by [`CacheKey`]
///
/// Entries expire `ttl` after insertion. At most `max_entries` live entries
/// are held; inserting a new key into a full table evicts the oldest
/// insertion. [`TtlCache::get_or_compute`] guarantees at most one in-flight
/// computation per key while letting different keys proceed in parallel.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<V>>>,
    flights: Mutex<HashMap<CacheKey, FlightSlot>>,
    max_entries: usize,
    next_sequence: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Neither table is left inconsistent by a panic mid-update, so a poisoned
/// lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache holding at most `max_entries` live entries
    ///
    /// A capacity of zero disables storage; every call computes.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
            max_entries,
            next_sequence: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the live value for `key`, if any
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = lock(&self.entries);
        let entry = entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its
    /// success
    ///
    /// `compute` runs at most once per call and only when no live entry
    /// exists. Concurrent callers for the same key wait for the first one and
    /// then re-check the table, so a successful computation is shared. Errors
    /// are returned as-is and never stored. If the caller's future is dropped
    /// mid-computation, nothing is stored and the key is released.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Cache hit");
            return Ok(value);
        }

        let flight = self.join_flight(&key).await;

        // Filled by whoever held the flight before us
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Cache hit after waiting on in-flight lookup");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "Cache miss");

        let value = compute().await?;
        self.insert(key, value.clone(), ttl);
        drop(flight);
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous entry
    ///
    /// Expired entries are purged first. If the table is still full and `key`
    /// is new, the oldest insertion is evicted.
    pub fn insert(&self, key: CacheKey, value: V, ttl: Duration) {
        if self.max_entries == 0 {
            return;
        }

        let now = Instant::now();
        let mut entries = lock(&self.entries);
        entries.retain(|_, entry| !entry.is_expired(now));

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.sequence)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(evicted = %oldest, "Cache full, evicted oldest entry");
            }
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                ttl,
                sequence,
            },
        );
    }

    /// Removes the entry for `key`; returns whether one existed
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        lock(&self.entries).remove(key).is_some()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        lock(&self.entries)
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Registers as a user of the key's flight slot, then waits for its lock
    async fn join_flight(&self, key: &CacheKey) -> Flight<'_, V> {
        let slot_lock = {
            let mut flights = lock(&self.flights);
            let slot = flights.entry(key.clone()).or_insert_with(|| FlightSlot {
                lock: Arc::new(AsyncMutex::new(())),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.lock)
        };

        // Built before awaiting so a cancelled wait still deregisters
        let mut flight = Flight {
            cache: self,
            key: key.clone(),
            guard: None,
        };
        flight.guard = Some(slot_lock.lock_owned().await);
        flight
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Holds a key's flight lock; releases and deregisters on drop
struct Flight<'a, V> {
    cache: &'a TtlCache<V>,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<V> Drop for Flight<'_, V> {
    fn drop(&mut self) {
        self.guard.take();
        let mut flights = lock(&self.cache.flights);
        if let Some(slot) = flights.get_mut(&self.key) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                flights.remove(&self.key);
            }
        }
    }
}
