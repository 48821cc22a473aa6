use dashmap::DashMap;

use crate::error::StoreError;
use crate::models::{Counts, Snapshot};

// Shared view/click counters keyed by event key.
//
// Backed by a lock-striped map: every increment is a read-modify-write under
// the owning shard's write lock, so concurrent callers never lose updates.
#[derive(Debug, Default)]
pub struct CounterStore {
    entries: DashMap<String, Counts>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Creates the entry on first view. Returns the new view count.
    pub fn record_view(&self, key: &str) -> u64 {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.views += 1;
            return entry.views;
        }
        let mut entry = self.entries.entry(key.to_owned()).or_default();
        entry.views += 1;
        entry.views
    }

    // Increments clicks for a key that has already been viewed.
    //
    // A click for an unknown key leaves the store untouched and reports
    // `StoreError::UnknownKey`; callers decide how loudly to fail.
    pub fn record_click(&self, key: &str) -> Result<u64, StoreError> {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.clicks += 1;
                Ok(entry.clicks)
            }
            None => Err(StoreError::UnknownKey(key.to_owned())),
        }
    }

    // Copies every entry. Each pair is read under its shard lock, so no
    // entry is ever seen half-updated. Shards are locked one at a time: the
    // copy is consistent per entry, not a single cut across all keys, and
    // writes to other shards proceed while it runs.
    pub fn snapshot(&self) -> Snapshot {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<Counts> {
        self.entries.get(key).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
