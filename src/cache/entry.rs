//! Cache Entry Module
//!
//! Defines a single cached value with the birth instant used for age-based expiry,
//! plus the read-only views handed back to callers.

use std::time::Instant;

use serde::Serialize;

// == Cache Entry ==
/// Represents a single cache entry with its value and age clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Set at insertion, forced overwrite or renewal
    pub birth: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry born now.
    pub fn new(value: V) -> Self {
        Self {
            value,
            birth: Instant::now(),
        }
    }

    // == Age ==
    /// Returns the milliseconds elapsed since the entry was born or renewed.
    pub fn age_ms(&self) -> u64 {
        self.birth.elapsed().as_millis() as u64
    }

    // == Is Expired ==
    /// Checks if the entry is older than `max_age_ms`.
    ///
    /// Boundary condition: an entry whose age equals `max_age_ms` is still fresh,
    /// it only expires once the bound is strictly exceeded.
    pub fn is_expired(&self, max_age_ms: u64) -> bool {
        self.age_ms() > max_age_ms
    }

    // == Renew ==
    /// Resets the age clock to zero.
    pub fn renew(&mut self) {
        self.birth = Instant::now();
    }

    // == Replace ==
    /// Swaps in a new value and resets the age clock.
    pub fn replace(&mut self, value: V) {
        self.value = value;
        self.birth = Instant::now();
    }
}

impl<V: Clone> CacheEntry<V> {
    /// Snapshots the entry as a caller-facing view.
    pub fn view(&self) -> EntryView<V> {
        EntryView {
            value: self.value.clone(),
            age: self.age_ms(),
        }
    }
}

// == Entry View ==
/// Value and age of an entry at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView<V> {
    pub value: V,
    /// Milliseconds since birth
    pub age: u64,
}

// == Dump Entry ==
/// One row of a cache dump, ordered from least to most recently used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry<V> {
    pub key: String,
    pub value: V,
    pub age: u64,
}
