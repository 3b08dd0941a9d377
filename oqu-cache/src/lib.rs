//! # oqu-cache
//!
//! Local, per-learner cache for AI-generated lessons and quizzes.
//!
//! ## Features
//!
//! - Order-independent fingerprints of a learner's interest set
//! - One bounded store per content kind, keyed by topic id
//! - Creation-time eviction and lazy expiry on read
//! - Pluggable storage surface (in-memory or one JSON file per kind)
//! - Storage failures degrade to cache misses, never to request failures
//!
//! ## Example
//!
//! ```no_run
//! use oqu_cache::{ContentKind, ContentStore, FileStorage, StoreConfig};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(FileStorage::new("/tmp/oqu-cache"));
//! let config = StoreConfig::builder().max_entries(20).max_age_days(3).build();
//! let quizzes: ContentStore<serde_json::Value> =
//!     ContentStore::new(ContentKind::Quiz, config, backend);
//!
//! if let Some(quiz) = quizzes.get("g7-percentages", &["AI"]) {
//!     println!("cached: {}", quiz);
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod error;

// Re-export main types for convenience
pub use cache::{
    fingerprint, CacheEntry, CacheStats, ContentKind, ContentStore, FileStorage, Lookup,
    MemoryStorage, PreferenceFingerprint, StaleReason, StorageBackend, StoreConfig,
    StoreConfigBuilder, TopicId, SECS_PER_DAY,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
