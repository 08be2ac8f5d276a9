//! Timed LRU Cache
//!
//! Public façade over [`EvictionStore`]. Rejects non-string keys, runs the
//! pending maintenance prune before each operation and otherwise delegates.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::CacheKey;
use crate::cache::{CacheStats, DumpEntry, EntryView, EvictionStore};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::MaintenanceScheduler;

/// Options for [`TimedLru::set_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SetOptions {
    /// Overwrite an existing key and mark it most recently used
    #[serde(default)]
    pub force: bool,
}

impl SetOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }

    /// Reads options from a JSON object. Only a literal `true` enables `force`.
    pub fn from_json(options: &Value) -> Self {
        Self {
            force: options.get("force").and_then(Value::as_bool) == Some(true),
        }
    }
}

/// In-process key/value cache with LRU eviction and age-based expiry.
///
/// Not synchronised: share it across threads only behind a lock.
///
/// # Example
/// ```
/// use timed_lru::{Config, TimedLru};
///
/// let mut lru = TimedLru::new(Config::default().with_max_items(2));
/// lru.set("a", 1);
/// lru.set("b", 2);
/// lru.set("c", 3);
///
/// assert!(lru.has("a").is_none());
/// assert_eq!(lru.get("b").map(|e| e.value), Some(2));
/// assert_eq!(lru.count(), 1);
/// ```
#[derive(Debug)]
pub struct TimedLru<V> {
    store: EvictionStore<V>,
    /// Present when automatic pruning is running
    scheduler: Option<MaintenanceScheduler>,
}

impl<V: Clone> TimedLru<V> {
    // == Constructor ==
    /// Creates a cache from a configuration.
    ///
    /// If a prune interval is configured but no tokio runtime is running,
    /// automatic pruning is disabled with a warning.
    pub fn new(config: Config) -> Self {
        let config = config.normalized();
        let scheduler = match config.prune_interval_ms.map(MaintenanceScheduler::start) {
            Some(Ok(scheduler)) => Some(scheduler),
            Some(Err(err)) => {
                warn!("Automatic pruning disabled: {}", err);
                None
            }
            None => None,
        };
        Self::from_parts(&config, scheduler)
    }

    /// Creates a cache, failing if automatic pruning cannot be started.
    pub fn try_new(config: Config) -> Result<Self> {
        let config = config.normalized();
        let scheduler = config
            .prune_interval_ms
            .map(MaintenanceScheduler::start)
            .transpose()?;
        Ok(Self::from_parts(&config, scheduler))
    }

    /// Creates a cache from a JSON options object, see [`Config::from_json`].
    pub fn from_json(options: &Value) -> Self {
        Self::new(Config::from_json(options))
    }

    fn from_parts(config: &Config, scheduler: Option<MaintenanceScheduler>) -> Self {
        info!(
            "Cache created: max_items={}, max_age_ms={}, prune_interval_ms={:?}",
            config.max_items,
            config.max_age_ms,
            scheduler.as_ref().map(|s| s.interval().as_millis())
        );
        Self {
            store: EvictionStore::new(config.max_items, config.max_age_ms),
            scheduler,
        }
    }

    // == Set ==
    /// Adds a key/value pair without overwriting an existing key.
    ///
    /// Returns the value the key holds afterwards (the old one if the key was
    /// already present), or None if the key is not string-typed.
    pub fn set<K: CacheKey>(&mut self, key: K, value: V) -> Option<EntryView<V>> {
        self.set_with(key, value, SetOptions::default())
    }

    /// Adds a key/value pair, overwriting an existing key when `options.force` is set.
    pub fn set_with<K: CacheKey>(
        &mut self,
        key: K,
        value: V,
        options: SetOptions,
    ) -> Option<EntryView<V>> {
        self.maintain();
        let key = key.as_key()?;
        Some(self.store.insert(key, value, options.force))
    }

    // == Get ==
    /// Returns a fresh entry and removes it from the cache.
    ///
    /// The key is removed even when it has expired.
    pub fn get<K: CacheKey>(&mut self, key: K) -> Option<EntryView<V>> {
        self.maintain();
        self.store.take(key.as_key()?)
    }

    // == Has ==
    /// Returns a fresh entry without removing it. Expired entries are dropped.
    pub fn has<K: CacheKey>(&mut self, key: K) -> Option<EntryView<V>> {
        self.maintain();
        self.store.peek(key.as_key()?)
    }

    // == Remove ==
    /// Removes a key.
    ///
    /// Returns whether it was present, or None if the key is not string-typed.
    pub fn remove<K: CacheKey>(&mut self, key: K) -> Option<bool> {
        self.maintain();
        Some(self.store.remove(key.as_key()?))
    }

    // == Empty ==
    /// Removes every entry.
    pub fn empty(&mut self) -> &mut Self {
        self.store.clear();
        self
    }

    // == Dump ==
    /// Lists all entries from least to most recently used, expired ones included.
    pub fn dump(&mut self) -> Vec<DumpEntry<V>> {
        self.maintain();
        self.store.dump()
    }

    // == Prune ==
    /// Removes every expired entry.
    pub fn prune(&mut self) {
        // An explicit prune also satisfies a pending tick
        if let Some(scheduler) = &self.scheduler {
            scheduler.take_due();
        }
        self.store.prune_expired();
    }

    // == Count ==
    pub fn count(&self) -> usize {
        self.store.len()
    }

    // == Renew ==
    /// Resets the age of a key without changing its eviction order.
    pub fn renew<K: CacheKey>(&mut self, key: K) -> Option<EntryView<V>> {
        self.maintain();
        self.store.renew(key.as_key()?)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn max_items(&self) -> usize {
        self.store.max_items()
    }

    pub fn max_age_ms(&self) -> u64 {
        self.store.max_age_ms()
    }

    /// Borrows the underlying store, e.g. for lazy iteration with [`EvictionStore::iter`].
    pub fn store(&self) -> &EvictionStore<V> {
        &self.store
    }

    pub fn auto_prune_enabled(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Cancels automatic pruning. Explicit [`TimedLru::prune`] still works.
    pub fn stop_auto_prune(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }

    // Runs the prune requested by the scheduler, if any.
    fn maintain(&mut self) {
        let due = self
            .scheduler
            .as_ref()
            .is_some_and(MaintenanceScheduler::take_due);
        if due {
            debug!("Running scheduled prune");
            self.store.prune_expired();
        }
    }
}

impl<V: Clone> Default for TimedLru<V> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
