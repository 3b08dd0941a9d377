//! Configuration for a content store

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default entry bound per store
pub const DEFAULT_MAX_ENTRIES: usize = 50;

pub const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Default maximum entry age: 7 days
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * SECS_PER_DAY);

/// Configuration for one content store, fixed for the store's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of distinct topics kept in the store
    pub max_entries: usize,

    /// Entries older than this are stale on read
    pub max_age: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl StoreConfig {
    /// Create a new builder for store configuration
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::Config(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        if self.max_age.is_zero() {
            return Err(CacheError::Config(
                "max_age must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// `max_age` in whole milliseconds, the resolution entries are stored at
    pub fn max_age_millis(&self) -> i128 {
        self.max_age.as_millis() as i128
    }
}

/// Builder for store configuration
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    max_entries: Option<usize>,
    max_age: Option<Duration>,
}

impl StoreConfigBuilder {
    /// Set maximum number of entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Set maximum entry age
    pub fn max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Set maximum entry age in days, saturating at `u64::MAX` seconds
    pub fn max_age_days(self, days: u64) -> Self {
        self.max_age(Duration::from_secs(days.saturating_mul(SECS_PER_DAY)))
    }

    pub fn build(self) -> StoreConfig {
        let defaults = StoreConfig::default();

        StoreConfig {
            max_entries: self.max_entries.unwrap_or(defaults.max_entries),
            max_age: self.max_age.unwrap_or(defaults.max_age),
        }
    }
}
