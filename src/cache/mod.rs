//! Cache Module
//!
//! The eviction engine: LRU ordering, the capacity bound and the age bound.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, DumpEntry, EntryView};
pub use lru::{Iter, LruList};
pub use stats::CacheStats;
pub use store::{DumpIter, EvictionStore};

// == Public Constants ==
/// Capacity bound used when none (or an invalid one) is configured
pub const DEFAULT_MAX_ITEMS: usize = 1000;

/// Age bound used when none (or an invalid one) is configured: one hour
pub const DEFAULT_MAX_AGE_MS: u64 = 60 * 60 * 1000;

/// Smallest accepted age bound in milliseconds
pub const MIN_MAX_AGE_MS: u64 = 100;

/// Smallest accepted automatic prune interval in milliseconds
pub const MIN_PRUNE_INTERVAL_MS: u64 = 1000;
