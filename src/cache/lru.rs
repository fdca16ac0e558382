//! Bounded Cache Module
//!
//! Fixed-capacity key-value store with least-recently-used eviction.
//!
//! Entries live in a slab of nodes linked into a recency list:
//! - Head = Most recently used
//! - Tail = Least recently used
//!
//! A hash map from key to slot index makes lookups, move-to-front and
//! evict-tail all O(1).

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::GatewayError;

/// Upper bound on slots reserved at construction; the slab grows on demand.
const INITIAL_RESERVE: usize = 1024;

// == Cache Entry ==
/// A stored key-value pair and its position in the recency list.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Bounded Cache ==
/// Recency-ordered cache holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    /// Key to slot index
    index: HashMap<K, usize, RandomState>,
    /// Node slab, `None` marks a free slot
    slots: Vec<Option<CacheEntry<K, V>>>,
    /// Reusable slot indices
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    pub fn new(capacity: usize) -> Result<Self, GatewayError> {
        if capacity == 0 {
            return Err(GatewayError::InvalidCapacity(capacity));
        }

        let reserve = capacity.min(INITIAL_RESERVE);
        Ok(Self {
            index: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            slots: Vec::with_capacity(reserve),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity,
        })
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|entry| &entry.value)
    }

    // == Put ==
    /// Inserts or overwrites `key` and marks it most recently used.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry, which is returned. Overwrites never evict.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.slots[idx].as_mut() {
                entry.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let idx = self.alloc(CacheEntry {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.index.insert(key, idx);

        evicted
    }

    // == Contains ==
    /// Checks whether `key` is cached. Does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|entry| &entry.value)
    }

    /// Returns the next eviction candidate.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.tail
            .and_then(|idx| self.slots[idx].as_ref())
            .map(|entry| (&entry.key, &entry.value))
    }

    // == Keys ==
    /// Returns all keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.slots[idx].as_ref() {
                Some(entry) => {
                    keys.push(entry.key.clone());
                    cursor = entry.next;
                }
                None => break,
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used entry.
    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let entry = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn alloc(&mut self, entry: CacheEntry<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.slots[head_idx].as_mut() {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = None;
        }
    }
}
