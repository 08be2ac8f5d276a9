//! Cache Store Module
//!
//! Main cache engine combining HashMap lookup with the LRU list and age-based expiry.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::cache::{
    CacheEntry, CacheStats, DumpEntry, EntryView, Iter, LruList, DEFAULT_MAX_AGE_MS,
    DEFAULT_MAX_ITEMS, MIN_MAX_AGE_MS,
};

// Node payload of the LRU list
#[derive(Debug)]
struct Record<V> {
    key: String,
    entry: CacheEntry<V>,
}

// == Eviction Store ==
/// Cache storage bounded by entry count (LRU eviction) and entry age (expiry).
///
/// Every key maps to one slot of the LRU list and every live slot is mapped by
/// its key, so `index.len() == order.len()` holds between calls.
#[derive(Debug)]
pub struct EvictionStore<V> {
    /// Key to list slot
    index: HashMap<String, usize>,
    /// Recency order, least recently used first
    order: LruList<Record<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_items: usize,
    /// Maximum entry age in milliseconds
    max_age_ms: u64,
}

impl<V: Clone> EvictionStore<V> {
    // == Constructor ==
    /// Creates a new store with the given bounds.
    ///
    /// A zero `max_items` or a `max_age_ms` below 100 falls back to the default.
    pub fn new(max_items: usize, max_age_ms: u64) -> Self {
        let max_items = if max_items == 0 {
            debug!("max_items must be positive, using {}", DEFAULT_MAX_ITEMS);
            DEFAULT_MAX_ITEMS
        } else {
            max_items
        };
        let max_age_ms = if max_age_ms < MIN_MAX_AGE_MS {
            debug!(
                "max_age_ms {} is below {}, using {}",
                max_age_ms, MIN_MAX_AGE_MS, DEFAULT_MAX_AGE_MS
            );
            DEFAULT_MAX_AGE_MS
        } else {
            max_age_ms
        };

        Self {
            index: HashMap::new(),
            order: LruList::new(),
            stats: CacheStats::new(),
            max_items,
            max_age_ms,
        }
    }

    // == Insert ==
    /// Stores a key-value pair.
    ///
    /// A new key is appended as most recently used and may evict the least
    /// recently used entries. An existing key is left untouched unless `force`
    /// is set, in which case its value and age are replaced and it becomes the
    /// most recently used entry.
    ///
    /// Returns a view of whatever the key holds afterwards.
    pub fn insert(&mut self, key: &str, value: V, force: bool) -> EntryView<V> {
        if let Some(&slot) = self.index.get(key) {
            if let Some(record) = self.order.get_mut(slot) {
                if force {
                    record.entry.replace(value);
                }
                let view = record.entry.view();
                if force {
                    self.order.move_to_back(slot);
                }
                return view;
            }
        }

        let entry = CacheEntry::new(value);
        let view = entry.view();
        let slot = self.order.push_back(Record {
            key: key.to_string(),
            entry,
        });
        self.index.insert(key.to_string(), slot);

        self.evict_overflow();
        self.stats.set_total_entries(self.len());
        view
    }

    // == Take ==
    /// Reads and removes an entry.
    ///
    /// The key is removed whether it was fresh, expired or missing; only a
    /// fresh entry produces a view.
    pub fn take(&mut self, key: &str) -> Option<EntryView<V>> {
        let view = self.fresh_view(key);
        let existed = self.remove(key);

        if view.is_some() {
            self.stats.record_hit();
        } else {
            if existed {
                self.stats.record_expirations(1);
            }
            self.stats.record_miss();
        }
        view
    }

    // == Peek ==
    /// Reads an entry without removing it.
    ///
    /// An expired entry is dropped on touch.
    pub fn peek(&mut self, key: &str) -> Option<EntryView<V>> {
        match self.fresh_view(key) {
            Some(view) => {
                self.stats.record_hit();
                Some(view)
            }
            None => {
                if self.remove(key) {
                    self.stats.record_expirations(1);
                }
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.order.remove(slot);
                self.stats.set_total_entries(self.len());
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry. Bounds and statistics counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Renew ==
    /// Resets the age of an entry without changing its recency.
    pub fn renew(&mut self, key: &str) -> Option<EntryView<V>> {
        let slot = *self.index.get(key)?;
        let record = self.order.get_mut(slot)?;
        record.entry.renew();
        Some(record.entry.view())
    }

    // == Iterate ==
    /// Lazily walks all entries from least to most recently used.
    ///
    /// No expiry filtering is applied: ages may exceed the bound.
    pub fn iter(&self) -> DumpIter<'_, V> {
        DumpIter {
            inner: self.order.iter(),
        }
    }

    // == Dump ==
    /// Collects [`EvictionStore::iter`] into a vector.
    pub fn dump(&self) -> Vec<DumpEntry<V>> {
        self.iter().collect()
    }

    // == Prune Expired ==
    /// Removes all entries older than the age bound, then compacts the LRU list.
    ///
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self) -> usize {
        let max_age_ms = self.max_age_ms;
        let expired: Vec<usize> = self
            .order
            .iter()
            .filter(|(_, record)| record.entry.is_expired(max_age_ms))
            .map(|(slot, _)| slot)
            .collect();

        for &slot in &expired {
            if let Some(record) = self.order.remove(slot) {
                self.index.remove(&record.key);
            }
        }
        self.compact();

        let removed = expired.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.len());

        if removed > 0 {
            info!("Prune: removed {} expired entries", removed);
        } else {
            debug!("Prune: no expired entries found");
        }
        removed
    }

    // == Set Max Items ==
    /// Changes the capacity bound and evicts down to it.
    ///
    /// Zero falls back to the default. Returns the number of evicted entries.
    pub fn set_max_items(&mut self, max_items: usize) -> usize {
        self.max_items = if max_items == 0 {
            DEFAULT_MAX_ITEMS
        } else {
            max_items
        };
        let evicted = self.evict_overflow();
        self.stats.set_total_entries(self.len());
        evicted
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn max_age_ms(&self) -> u64 {
        self.max_age_ms
    }

    /// Number of list slots held, vacated ones included.
    pub fn slot_count(&self) -> usize {
        self.order.slot_count()
    }

    fn fresh_view(&self, key: &str) -> Option<EntryView<V>> {
        let slot = *self.index.get(key)?;
        let record = self.order.get(slot)?;
        let age = record.entry.age_ms();
        (age <= self.max_age_ms).then(|| EntryView {
            value: record.entry.value.clone(),
            age,
        })
    }

    fn evict_overflow(&mut self) -> usize {
        let mut evicted = 0;
        while self.order.len() > self.max_items {
            let Some(record) = self.order.pop_front() else {
                break;
            };
            self.index.remove(&record.key);
            self.stats.record_eviction();
            evicted += 1;
            debug!("Evicted least recently used key '{}'", record.key);
        }
        evicted
    }

    // Slots change on compaction, so the index is rewritten from the list.
    fn compact(&mut self) {
        self.order.compact();
        for (slot, record) in self.order.iter() {
            if let Some(indexed) = self.index.get_mut(&record.key) {
                *indexed = slot;
            }
        }
    }
}

// == Dump Iterator ==
/// Lazy iterator over cache entries, least recently used first.
pub struct DumpIter<'a, V> {
    inner: Iter<'a, Record<V>>,
}

impl<V: Clone> Iterator for DumpIter<'_, V> {
    type Item = DumpEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, record)| DumpEntry {
            key: record.key.clone(),
            value: record.entry.value.clone(),
            age: record.entry.age_ms(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn keys(store: &EvictionStore<String>) -> Vec<String> {
        store.iter().map(|e| e.key).collect()
    }

    fn store_with(max_items: usize, keys: &[&str]) -> EvictionStore<String> {
        let mut store = EvictionStore::new(max_items, 60_000);
        for key in keys {
            store.insert(key, format!("value_{}", key), false);
        }
        store
    }

    #[test]
    fn test_store_new() {
        let store: EvictionStore<String> = EvictionStore::new(100, 300);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_items(), 100);
        assert_eq!(store.max_age_ms(), 300);
    }

    #[test]
    fn test_store_new_falls_back_on_invalid_bounds() {
        let store: EvictionStore<String> = EvictionStore::new(0, 99);
        assert_eq!(store.max_items(), DEFAULT_MAX_ITEMS);
        assert_eq!(store.max_age_ms(), DEFAULT_MAX_AGE_MS);
    }

    #[test]
    fn test_store_insert_returns_fresh_view() {
        let mut store = EvictionStore::new(100, 60_000);

        let view = store.insert("key1", "value1".to_string(), false);

        assert_eq!(view.value, "value1");
        assert_eq!(view.age, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_insert_without_force_keeps_old_value() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);
        let view = store.insert("key1", "value2".to_string(), false);

        assert_eq!(view.value, "value1");
        assert_eq!(store.peek("key1").unwrap().value, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_insert_with_force_overwrites() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);
        let view = store.insert("key1", "value2".to_string(), true);

        assert_eq!(view.value, "value2");
        assert_eq!(store.peek("key1").unwrap().value, "value2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_force_moves_to_most_recent() {
        let mut store = store_with(3, &["a", "b", "c"]);

        store.insert("a", "new".to_string(), true);
        assert_eq!(keys(&store), vec!["b", "c", "a"]);

        // b is now the eviction candidate
        store.insert("d", "d".to_string(), false);
        assert_eq!(keys(&store), vec!["c", "a", "d"]);
    }

    #[test]
    fn test_store_plain_overwrite_keeps_position() {
        let mut store = store_with(3, &["a", "b", "c"]);

        store.insert("a", "ignored".to_string(), false);
        store.insert("d", "d".to_string(), false);

        assert_eq!(keys(&store), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_store_take_consumes() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);

        let view = store.take("key1").unwrap();
        assert_eq!(view.value, "value1");
        assert!(view.age < 50);
        assert!(store.take("key1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_take_nonexistent() {
        let mut store: EvictionStore<String> = EvictionStore::new(100, 60_000);

        assert!(store.take("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_peek_is_non_destructive() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);

        assert_eq!(store.peek("key1").unwrap().value, "value1");
        assert_eq!(store.peek("key1").unwrap().value, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);

        assert!(store.remove("key1"));
        assert!(!store.remove("key1"));
        assert!(store.is_empty());
        assert!(store.peek("key1").is_none());
    }

    #[test]
    fn test_store_remove_oldest_updates_eviction_candidate() {
        let mut store = store_with(3, &["a", "b", "c"]);

        store.remove("a");
        store.insert("d", "d".to_string(), false);
        store.insert("e", "e".to_string(), false);

        // b became the oldest once a was removed
        assert_eq!(keys(&store), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_store_age_expiration() {
        let mut store = EvictionStore::new(100, 100);

        store.insert("key1", "value1".to_string(), false);
        store.insert("key2", "value2".to_string(), false);
        assert!(store.peek("key1").is_some());

        // Wait past the age bound
        sleep(Duration::from_millis(150));

        assert!(store.peek("key1").is_none());
        assert!(store.take("key2").is_none());
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 2);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store_with(3, &["key1", "key2", "key3"]);

        // Store is full, adding key4 should evict key1 (oldest)
        store.insert("key4", "value4".to_string(), false);

        assert_eq!(store.len(), 3);
        assert!(store.peek("key1").is_none());
        assert!(store.peek("key2").is_some());
        assert!(store.peek("key3").is_some());
        assert!(store.peek("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_reads_do_not_reorder() {
        let mut store = store_with(3, &["key1", "key2", "key3"]);

        store.peek("key1").unwrap();
        store.insert("key4", "value4".to_string(), false);

        assert!(store.peek("key1").is_none());
    }

    #[test]
    fn test_store_renew_resets_age_not_order() {
        let mut store = EvictionStore::new(2, 100);

        store.insert("a", "a".to_string(), false);
        store.insert("b", "b".to_string(), false);
        sleep(Duration::from_millis(120));

        let view = store.renew("a").unwrap();
        assert!(view.age < 100);
        assert!(store.peek("a").is_some());

        // a is still the least recently used
        store.insert("c", "c".to_string(), false);
        assert!(store.peek("a").is_none());
    }

    #[test]
    fn test_store_renew_missing() {
        let mut store: EvictionStore<String> = EvictionStore::new(2, 100);
        assert!(store.renew("missing").is_none());
    }

    #[test]
    fn test_store_clear() {
        let mut store = store_with(10, &["a", "b", "c"]);

        store.clear();

        assert!(store.is_empty());
        assert!(store.dump().is_empty());
        assert_eq!(store.max_items(), 10);

        store.insert("d", "d".to_string(), false);
        assert_eq!(keys(&store), vec!["d"]);
    }

    #[test]
    fn test_store_dump_order_and_ages() {
        let mut store = EvictionStore::new(10, 100);
        store.insert("a", 1, false);
        store.insert("b", 2, false);
        sleep(Duration::from_millis(120));

        let dump = store.dump();

        // Expired entries are still listed
        assert_eq!(dump.len(), 2);
        assert_eq!(dump[0].key, "a");
        assert_eq!(dump[0].value, 1);
        assert!(dump[0].age >= 120);
        assert_eq!(dump[1].key, "b");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_prune_expired() {
        let mut store = EvictionStore::new(100, 100);

        store.insert("old1", "v".to_string(), false);
        store.insert("old2", "v".to_string(), false);
        sleep(Duration::from_millis(150));
        store.insert("new", "v".to_string(), false);

        let removed = store.prune_expired();

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.peek("new").is_some());
    }

    #[test]
    fn test_store_prune_compacts_and_keeps_order() {
        let mut store = EvictionStore::new(100, 100);

        store.insert("x", "v".to_string(), false);
        store.insert("a", "v".to_string(), false);
        store.insert("y", "v".to_string(), false);
        sleep(Duration::from_millis(150));
        store.renew("a");
        store.insert("b", "v".to_string(), false);
        store.remove("b");
        store.insert("c", "v".to_string(), false);
        assert!(store.slot_count() > 2);

        store.prune_expired();

        assert_eq!(store.slot_count(), 2);
        assert_eq!(keys(&store), vec!["a", "c"]);

        // Slots were rewritten, lookups must still resolve
        store.insert("d", "v".to_string(), true);
        assert!(store.remove("a"));
        assert_eq!(keys(&store), vec!["c", "d"]);
        assert_eq!(store.take("c").unwrap().value, "v");
    }

    #[test]
    fn test_store_set_max_items_evicts() {
        let mut store = store_with(5, &["a", "b", "c", "d", "e"]);

        let evicted = store.set_max_items(2);

        assert_eq!(evicted, 3);
        assert_eq!(keys(&store), vec!["d", "e"]);
        assert_eq!(store.stats().evictions, 3);
    }

    #[test]
    fn test_store_stats() {
        let mut store = EvictionStore::new(100, 60_000);

        store.insert("key1", "value1".to_string(), false);
        store.peek("key1").unwrap(); // hit
        let _ = store.take("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
