//! API Module
//!
//! The public cache surface: key validation, the maintenance check and
//! delegation to the eviction store.
//!
//! # Operations
//! - `set` / `set_with` - Store a key-value pair, optionally forcing an overwrite
//! - `get` - Read and consume a key
//! - `has` - Read a key without consuming it
//! - `remove` - Delete a key
//! - `empty` - Delete everything
//! - `dump` - List entries from least to most recently used
//! - `prune` - Drop expired entries
//! - `count` - Number of entries
//! - `renew` - Reset the age of a key

pub mod cache;
pub mod key;

pub use cache::{SetOptions, TimedLru};
pub use key::CacheKey;
