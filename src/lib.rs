//! Timed LRU - An in-process key/value cache
//!
//! Evicts entries under two independent pressures: a maximum entry count
//! (least recently used first) and a maximum entry age.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use api::{CacheKey, SetOptions, TimedLru};
pub use cache::{CacheStats, DumpEntry, EntryView, EvictionStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::MaintenanceScheduler;
