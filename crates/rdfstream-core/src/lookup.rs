//! Fixed-capacity string lookup table with LRU eviction.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use crate::recency::RecencyList;

/// Result of [`LookupTable::get_or_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEntry {
    /// Id to reference the value from a term.
    pub get_id: u32,
    /// Id to put on the entry row: `0` when it is the previous set id plus one.
    pub set_id: u32,
    /// True if the value was just inserted, fresh or replacing an evicted one.
    pub new_entry: bool,
}

/// Maps strings to dense ids in `1..=capacity`.
///
/// When full, inserting a new value evicts the least recently used one and
/// reuses its id. With generation tracking enabled every (re)assignment of an
/// id bumps that id's generation, so dependent caches can detect that a
/// recorded id no longer names the same value.
#[derive(Debug, Clone)]
pub struct LookupTable {
    capacity: usize,
    map: HashMap<Arc<str>, u32>,
    values: Vec<Option<Arc<str>>>,
    generations: Vec<u32>,
    recency: RecencyList,
    used: usize,
    last_set_id: u32,
}

impl LookupTable {
    pub fn new(capacity: NonZeroUsize, track_generations: bool) -> Self {
        let capacity = capacity.get();
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            values: vec![None; capacity + 1],
            generations: if track_generations {
                vec![0; capacity + 1]
            } else {
                Vec::new()
            },
            recency: RecencyList::with_capacity(capacity),
            used: 0,
            last_set_id: 0,
        }
    }

    /// Look up `value`, inserting it if absent.
    pub fn get_or_add(&mut self, value: &str) -> LookupEntry {
        if let Some(id) = self.map.get(value).copied() {
            self.recency.touch(id as usize);
            return LookupEntry {
                get_id: id,
                set_id: id,
                new_entry: false,
            };
        }

        let slot = if self.used < self.capacity {
            self.used += 1;
            self.recency.push_back(self.used);
            self.used
        } else {
            let slot = self.recency.lru();
            if let Some(evicted) = self.values[slot].take() {
                debug!(id = slot, value = %evicted, "evicting lookup entry");
                self.map.remove(&evicted);
            }
            self.recency.touch(slot);
            slot
        };

        let id = slot as u32;
        let value: Arc<str> = Arc::from(value);
        self.map.insert(Arc::clone(&value), id);
        self.values[slot] = Some(value);
        if let Some(generation) = self.generations.get_mut(slot) {
            *generation = generation.wrapping_add(1);
        }

        let set_id = if id == self.last_set_id + 1 { 0 } else { id };
        self.last_set_id = id;
        LookupEntry {
            get_id: id,
            set_id,
            new_entry: true,
        }
    }

    /// Mark `id` as recently used without changing its value.
    pub fn on_access(&mut self, id: u32) {
        let slot = id as usize;
        if slot >= 1 && slot <= self.used {
            self.recency.touch(slot);
        }
    }

    /// Current generation of `id`; always `0` without generation tracking.
    pub fn generation(&self, id: u32) -> u32 {
        self.generations.get(id as usize).copied().unwrap_or(0)
    }

    pub fn tracks_generations(&self) -> bool {
        !self.generations.is_empty()
    }

    /// Id of `value` if present. Does not touch recency.
    pub fn get(&self, value: &str) -> Option<u32> {
        self.map.get(value).copied()
    }

    /// Value currently stored under `id`.
    pub fn value(&self, id: u32) -> Option<&str> {
        self.values.get(id as usize)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
