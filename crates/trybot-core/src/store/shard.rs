use std::collections::{BTreeMap, HashMap};

use trybot_models::{CorrelationKey, CorrelationRecord};

struct Entry {
    record: CorrelationRecord,
    last_access: u64,
}

/// Recency-ordered map of correlation records.
///
/// Ticks come from a clock shared by every shard of a store, so the oldest
/// entries of two shards can be compared. Capacity is enforced by the store.
pub(crate) struct LruShard {
    entries: HashMap<CorrelationKey, Entry>,
    recency: BTreeMap<u64, CorrelationKey>,
}

impl LruShard {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &CorrelationKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Access an existing record, moving it to `tick`.
    pub fn access(&mut self, key: &CorrelationKey, tick: u64) -> Option<&mut CorrelationRecord> {
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.last_access);
        self.recency.insert(tick, key.clone());
        entry.last_access = tick;

        Some(&mut entry.record)
    }

    /// Insert a record for an absent key.
    pub fn insert(&mut self, record: CorrelationRecord, tick: u64) {
        debug_assert!(!self.entries.contains_key(record.key()));

        self.recency.insert(tick, record.key().clone());
        self.entries.insert(
            record.key().clone(),
            Entry {
                record,
                last_access: tick,
            },
        );
    }

    /// Tick of the least recently accessed record.
    pub fn oldest_tick(&self) -> Option<u64> {
        self.recency.first_key_value().map(|(tick, _)| *tick)
    }

    /// Remove the least recently accessed record.
    pub fn pop_oldest(&mut self) -> Option<CorrelationRecord> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key).map(|e| e.record)
    }
}
