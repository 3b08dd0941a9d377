//! # Preference-Aware Content Cache
//!
//! Stores generated lessons and quizzes so a learner who revisits a topic
//! with the same interests does not pay for another generation call.
//!
//! ## Validity
//!
//! An entry serves a request only if both hold:
//! - it was generated for the same interest set (compared through a
//!   [`PreferenceFingerprint`]), and
//! - it is no older than the store's `max_age`.
//!
//! ## Bounds
//!
//! Each store keeps at most `max_entries` topics. Admitting a new topic
//! into a full store evicts the entry created earliest (creation order,
//! not access order).
//!
//! ## Example
//!
//! ```rust
//! use oqu_cache::cache::{ContentKind, ContentStore, MemoryStorage, StoreConfig};
//! use std::sync::Arc;
//!
//! let store: ContentStore<String> = ContentStore::new(
//!     ContentKind::Lesson,
//!     StoreConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//! );
//!
//! store.put("g7-percentages", &["Football", "AI"], &"lesson".to_string());
//! assert!(store.get("g7-percentages", &["AI", "Football"]).is_some());
//! assert!(store.get("g7-percentages", &["Chess"]).is_none());
//! ```

pub mod backend;
pub mod config;
pub mod entry;
pub mod fingerprint;
pub mod invalidation;
pub mod store;
pub mod types;

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use config::{StoreConfig, StoreConfigBuilder, DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES, SECS_PER_DAY};
pub use entry::CacheEntry;
pub use fingerprint::{fingerprint, PreferenceFingerprint};
pub use invalidation::{Lookup, StaleReason};
pub use store::ContentStore;
pub use types::{CacheStats, ContentKind, TopicId};
