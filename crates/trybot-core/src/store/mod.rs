//! Correlation store.

mod shard;

use std::{
    collections::hash_map::RandomState,
    hash::BuildHasher,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use time::OffsetDateTime;
use tracing::{debug, info};
use trybot_config::CacheConfig;
use trybot_models::{CorrelationKey, CorrelationRecord};

use self::shard::LruShard;

/// Bounded, least-recently-used store of correlation records.
///
/// Keys are spread over independent lock shards: operations on keys living
/// in different shards never wait on each other. Capacity and recency are
/// tracked store-wide, so the store never holds more than `capacity` records
/// and a full store evicts its least recently accessed record, whatever its
/// shard.
///
/// Every per-key operation holds its shard lock for its whole duration, so
/// `get_or_create` and `mark_reported` are atomic for a given key. At most
/// one shard lock is held at a time.
pub struct CorrelationStore {
    shards: Vec<Mutex<LruShard>>,
    hasher: RandomState,
    capacity: usize,
    clock: AtomicU64,
    count: AtomicUsize,
}

impl CorrelationStore {
    /// Create a single-shard store.
    pub fn new(capacity: usize) -> Self {
        Self::with_shards(capacity, 1)
    }

    /// Create a store spread over `shards` locks.
    ///
    /// The shard count is clamped between 1 and the capacity.
    pub fn with_shards(capacity: usize, shards: usize) -> Self {
        let capacity = capacity.max(1);
        let shards = shards.clamp(1, capacity);

        Self {
            shards: (0..shards).map(|_| Mutex::new(LruShard::new())).collect(),
            hasher: RandomState::new(),
            capacity,
            clock: AtomicU64::new(0),
            count: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_shards(config.capacity, config.shards)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Count stored records.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| lock(s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a record, counting as an access.
    pub fn get(&self, key: &CorrelationKey) -> Option<CorrelationRecord> {
        let mut shard = self.shard(key);
        shard.access(key, self.tick()).map(|r| r.clone())
    }

    /// Get the record for `key`, creating it with `factory` when absent.
    ///
    /// An existing record only gets its update timestamp refreshed. When the
    /// store is full, the least recently accessed record is evicted first.
    pub fn get_or_create<F>(&self, key: &CorrelationKey, factory: F) -> CorrelationRecord
    where
        F: FnOnce() -> CorrelationRecord,
    {
        loop {
            {
                let mut shard = self.shard(key);

                if let Some(record) = shard.access(key, self.tick()) {
                    record.touch(OffsetDateTime::now_utc());
                    debug!(key = %key, state = ?record.state(), message = "Reusing correlation record");
                    return record.clone();
                }

                if self.reserve_slot() {
                    let record = factory();
                    debug_assert_eq!(record.key(), key);

                    shard.insert(record.clone(), self.tick());
                    debug!(key = %key, message = "Created correlation record");
                    return record;
                }
            }

            // Full: free a slot with the shard lock released, then retry.
            self.evict_oldest();
        }
    }

    /// Move a pending record to the reported state.
    ///
    /// Returns `false` without any change when the record is absent or
    /// already reported.
    pub fn mark_reported(&self, key: &CorrelationKey) -> bool {
        let mut shard = self.shard(key);
        shard
            .access(key, self.tick())
            .map(|r| r.mark_reported(OffsetDateTime::now_utc()))
            .unwrap_or(false)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Take one slot of capacity. Returns `false` when the store is full.
    fn reserve_slot(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < self.capacity).then_some(count + 1)
            })
            .is_ok()
    }

    /// Evict the least recently accessed record of the whole store.
    fn evict_oldest(&self) {
        loop {
            let oldest = self
                .shards
                .iter()
                .enumerate()
                .filter_map(|(index, shard)| lock(shard).oldest_tick().map(|tick| (tick, index)))
                .min();

            // Concurrent evictions already made room.
            let Some((tick, index)) = oldest else {
                return;
            };

            let mut shard = lock(&self.shards[index]);
            if shard.oldest_tick() != Some(tick) {
                // Accessed or evicted since the scan.
                continue;
            }

            if let Some(evicted) = shard.pop_oldest() {
                self.count.fetch_sub(1, Ordering::AcqRel);
                info!(
                    key = %evicted.key(),
                    state = ?evicted.state(),
                    message = "Evicted correlation record",
                );
            }
            return;
        }
    }

    fn shard(&self, key: &CorrelationKey) -> MutexGuard<'_, LruShard> {
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        lock(&self.shards[index])
    }
}

fn lock(shard: &Mutex<LruShard>) -> MutexGuard<'_, LruShard> {
    // Shard state is never left half-updated, so a poisoned lock is still usable.
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use pretty_assertions::assert_eq;
    use trybot_config::Config;
    use trybot_models::CorrelationState;

    use super::*;

    fn key(pull_request_id: u64, revision: &str) -> CorrelationKey {
        CorrelationKey::new(pull_request_id, revision).unwrap()
    }

    fn create(store: &CorrelationStore, key: &CorrelationKey) -> CorrelationRecord {
        store.get_or_create(key, || {
            CorrelationRecord::new(key.clone(), OffsetDateTime::now_utc())
        })
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let store = CorrelationStore::new(10);
        let key = key(42, "abc123");

        let first = create(&store, &key);
        let second = store.get_or_create(&key, || panic!("factory must not run"));

        assert_eq!(store.len(), 1);
        assert_eq!(first.key(), second.key());
        assert_eq!(first.created_at(), second.created_at());
        assert!(second.updated_at() >= first.updated_at());
        assert_eq!(second.state(), CorrelationState::Pending);
    }

    #[test]
    fn mark_reported_on_absent_key() {
        let store = CorrelationStore::new(10);
        assert!(!store.mark_reported(&key(42, "abc123")));
        assert!(store.is_empty());
    }

    #[test]
    fn mark_reported_only_once() {
        let store = CorrelationStore::new(10);
        let key = key(42, "abc123");
        create(&store, &key);

        assert!(store.mark_reported(&key));
        assert!(!store.mark_reported(&key));
        assert_eq!(store.get(&key).unwrap().state(), CorrelationState::Reported);
    }

    #[test]
    fn reported_record_is_reused_as_is() {
        let store = CorrelationStore::new(10);
        let key = key(42, "abc123");
        create(&store, &key);
        store.mark_reported(&key);

        let record = create(&store, &key);
        assert_eq!(record.state(), CorrelationState::Reported);
        assert!(!store.mark_reported(&key));
    }

    #[test]
    fn evicts_least_recently_accessed() {
        let capacity = 3;
        let store = CorrelationStore::new(capacity);
        let keys: Vec<_> = (1..=capacity as u64 + 1).map(|n| key(n, "rev")).collect();

        for k in &keys[..capacity] {
            create(&store, k);
        }

        // Reading the first key makes the second one the oldest.
        assert!(store.get(&keys[0]).is_some());
        create(&store, &keys[capacity]);

        assert_eq!(store.len(), capacity);
        assert!(store.get(&keys[1]).is_none());
        assert!(store.get(&keys[0]).is_some());
        assert!(store.get(&keys[2]).is_some());
        assert!(store.get(&keys[3]).is_some());
    }

    #[test]
    fn pending_and_reported_records_share_slots() {
        let store = CorrelationStore::new(2);
        let (a, b, c) = (key(1, "a"), key(2, "b"), key(3, "c"));

        create(&store, &a);
        create(&store, &b);
        store.mark_reported(&b);
        // `a` is older than `b`, even if `b` is already reported.
        create(&store, &c);

        assert!(store.get(&a).is_none());
        assert!(store.get(&b).is_some());
    }

    #[test]
    fn evicted_pending_record_is_silently_lost() {
        let store = CorrelationStore::new(1);
        let (a, b) = (key(1, "a"), key(2, "b"));

        create(&store, &a);
        create(&store, &b);

        assert!(!store.mark_reported(&a));
        assert!(store.mark_reported(&b));
    }

    #[test]
    fn shards_are_clamped() {
        assert_eq!(CorrelationStore::with_shards(4, 16).shard_count(), 4);
        assert_eq!(CorrelationStore::with_shards(100, 0).shard_count(), 1);
        assert_eq!(CorrelationStore::with_shards(0, 8).capacity(), 1);
    }

    #[test]
    fn sharded_store_evicts_least_recently_accessed() {
        let config = Config::from_env_no_version().unwrap();
        let store = CorrelationStore::from_config(&config.cache);
        let capacity = store.capacity();

        let keys: Vec<_> = (0..=capacity as u64).map(|n| key(n, "rev")).collect();
        for k in &keys[..capacity] {
            create(&store, k);
        }

        // Nothing is lost while the store is not over capacity.
        assert_eq!(store.len(), capacity);
        assert!(keys[..capacity].iter().all(|k| store.get(k).is_some()));

        // Reading the first key makes the second one the oldest.
        assert!(store.get(&keys[0]).is_some());
        create(&store, &keys[capacity]);

        assert_eq!(store.len(), capacity);
        assert!(store.get(&keys[1]).is_none());
        assert!(store.get(&keys[0]).is_some());
        assert!(store.get(&keys[capacity]).is_some());
    }

    #[test]
    fn sharded_store_never_exceeds_capacity() {
        // 10 does not divide evenly over 8 shards.
        let store = CorrelationStore::with_shards(10, 8);
        for n in 0..1000 {
            create(&store, &key(n, "rev"));
            assert!(store.len() <= 10);
        }

        assert_eq!(store.len(), 10);
        // The last ten keys survive, whatever their shard.
        assert!((990..1000).all(|n| store.get(&key(n, "rev")).is_some()));
    }

    #[test]
    fn concurrent_inserts_stay_bounded() {
        let store = CorrelationStore::with_shards(32, 8);
        let threads = 8;
        let barrier = Barrier::new(threads);

        thread::scope(|s| {
            for t in 0..threads as u64 {
                let (store, barrier) = (&store, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    for n in 0..200 {
                        create(store, &key(t * 1000 + n, "rev"));
                    }
                });
            }
        });

        assert_eq!(store.len(), 32);
    }

    #[test]
    fn concurrent_get_or_create_creates_one_record() {
        let store = CorrelationStore::with_shards(64, 8);
        let key = key(7, "def456");
        let threads = 16;
        let barrier = Barrier::new(threads);

        let created_at: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        create(&store, &key).created_at()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.len(), 1);
        assert!(created_at.iter().all(|t| *t == created_at[0]));
    }

    #[test]
    fn concurrent_mark_reported_succeeds_once() {
        let store = CorrelationStore::with_shards(64, 8);
        let key = key(42, "abc123");
        create(&store, &key);

        let threads = 16;
        let barrier = Barrier::new(threads);
        let successes = thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        store.mark_reported(&key)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
    }
}
