//! Configuration Module
//!
//! Loads cache options from environment variables or JSON option objects.
//!
//! Every source goes through the same normalisation: numbers are rounded up to
//! whole values, and anything missing, non-numeric or out of range silently
//! falls back to its default.

use std::env;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{DEFAULT_MAX_AGE_MS, DEFAULT_MAX_ITEMS, MIN_MAX_AGE_MS, MIN_PRUNE_INTERVAL_MS};
use crate::error::Result;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_items: usize,
    /// Maximum entry age in milliseconds
    pub max_age_ms: u64,
    /// Automatic prune interval in milliseconds, None = prune only on demand
    pub prune_interval_ms: Option<u64>,
}

impl Config {
    /// Builds a config from raw numeric options.
    pub fn from_raw(
        max_items: Option<f64>,
        max_age_ms: Option<f64>,
        prune_interval_ms: Option<f64>,
    ) -> Self {
        Self {
            max_items: accept("max_items", max_items, |n| n > 0.0)
                .map(|n| n as usize)
                .unwrap_or(DEFAULT_MAX_ITEMS),
            max_age_ms: accept("max_age_ms", max_age_ms, |n| n >= MIN_MAX_AGE_MS as f64)
                .unwrap_or(DEFAULT_MAX_AGE_MS),
            prune_interval_ms: accept("prune_interval_ms", prune_interval_ms, |n| {
                n >= MIN_PRUNE_INTERVAL_MS as f64
            }),
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ITEMS` - Maximum entries (default: 1000)
    /// - `CACHE_MAX_AGE_MS` - Maximum entry age in ms (default: 3600000, minimum 100)
    /// - `CACHE_PRUNE_INTERVAL_MS` - Automatic prune interval in ms (minimum 1000, unset = disabled)
    pub fn from_env() -> Self {
        let read = |name: &str| {
            env::var(name)
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
        };

        Self::from_raw(
            read("CACHE_MAX_ITEMS"),
            read("CACHE_MAX_AGE_MS"),
            read("CACHE_PRUNE_INTERVAL_MS"),
        )
    }

    /// Creates a Config from a JSON options object.
    ///
    /// Recognised fields are `maxItems`, `maxAgeMs` and `pruneIntervalMs`
    /// (snake_case spellings are accepted too). A non-object value yields
    /// the defaults.
    pub fn from_json(options: &Value) -> Self {
        let field = |names: [&str; 2]| names.iter().find_map(|name| options.get(*name)?.as_f64());

        Self::from_raw(
            field(["maxItems", "max_items"]),
            field(["maxAgeMs", "max_age_ms"]),
            field(["pruneIntervalMs", "prune_interval_ms"]),
        )
    }

    /// Parses JSON option text, see [`Config::from_json`].
    ///
    /// Only malformed JSON is an error; bad values still fall back silently.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&options))
    }

    /// Re-applies the range rules to a hand-built config.
    pub fn normalized(self) -> Self {
        Self::from_raw(
            Some(self.max_items as f64),
            Some(self.max_age_ms as f64),
            self.prune_interval_ms.map(|n| n as f64),
        )
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_max_age_ms(mut self, max_age_ms: u64) -> Self {
        self.max_age_ms = max_age_ms;
        self
    }

    pub fn with_prune_interval_ms(mut self, prune_interval_ms: u64) -> Self {
        self.prune_interval_ms = Some(prune_interval_ms);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_age_ms: DEFAULT_MAX_AGE_MS,
            prune_interval_ms: None,
        }
    }
}

// Rounds an accepted value up, rejects non-finite and out-of-range ones.
fn accept(name: &str, raw: Option<f64>, valid: impl Fn(f64) -> bool) -> Option<u64> {
    let n = raw?;
    if n.is_finite() && valid(n) {
        Some(n.ceil() as u64)
    } else {
        debug!("Ignoring out-of-range option {}={}", name, n);
        None
    }
}
