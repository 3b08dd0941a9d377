//! Content store: one bounded, expiring, preference-aware blob per kind

use crate::cache::{
    backend::StorageBackend,
    config::StoreConfig,
    entry::CacheEntry,
    fingerprint::PreferenceFingerprint,
    invalidation::{Lookup, StaleReason},
    types::{CacheStats, ContentKind, TopicId},
};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Persisted shape of one store: topic id -> entry.
///
/// Contents stay untyped here so one undecodable entry does not make the
/// rest of the blob unreadable.
type Blob = BTreeMap<TopicId, CacheEntry<Value>>;

/// Bounded, expiring storage for exactly one content kind.
///
/// - `get` returns content only when the entry was generated for the same
///   interest set and is no older than `max_age`. It never modifies the
///   blob: stale entries stay until overwritten or evicted.
/// - `put` admits a new topic into a full store by evicting the entry with
///   the oldest creation time (ties go to the smallest topic id).
/// - Storage failures are logged and counted, never returned: a failed read
///   is a miss and a failed write is a no-op.
///
/// Each operation runs under one lock, so a read-modify-write cycle never
/// interleaves with another on the same store.
pub struct ContentStore<T> {
    kind: ContentKind,
    config: StoreConfig,
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    stats: Mutex<CacheStats>,
    _content: PhantomData<fn() -> T>,
}

impl<T> ContentStore<T> {
    /// Create a store for `kind` persisting to `backend`
    ///
    /// A `max_entries` of 0 is raised to 1 so the entry bound always holds.
    pub fn new(kind: ContentKind, mut config: StoreConfig, backend: Arc<dyn StorageBackend>) -> Self {
        if config.max_entries == 0 {
            warn!("{} store configured with max_entries = 0, using 1", kind);
            config.max_entries = 1;
        }
        debug!("Initializing {} store with config: {:?}", kind, config);

        Self {
            kind,
            config,
            backend,
            clock: Arc::new(SystemClock),
            stats: Mutex::new(CacheStats::default()),
            _content: PhantomData,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot of this store's counters
    pub fn stats(&self) -> CacheStats {
        self.lock().clone()
    }

    /// Number of entries held, including stale ones; 0 if unreadable
    pub fn len(&self) -> usize {
        let _guard = self.lock();
        self.load().map(|blob| blob.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any entry, fresh or stale, exists for `topic_id`
    pub fn contains_topic(&self, topic_id: &str) -> bool {
        let _guard = self.lock();
        self.load()
            .map(|blob| blob.contains_key(topic_id))
            .unwrap_or(false)
    }

    /// Topic ids currently held, in key order
    pub fn topics(&self) -> Vec<TopicId> {
        let _guard = self.lock();
        self.load()
            .map(|blob| blob.into_keys().collect())
            .unwrap_or_default()
    }

    /// Remove every entry of this store
    pub fn clear(&self) {
        let mut stats = self.lock();

        match self.backend.remove(self.kind.storage_key()) {
            Ok(()) => info!("Cleared {} cache", self.kind),
            Err(e) => {
                stats.storage_failures += 1;
                warn!("Error clearing {} cache: {}", self.kind, e);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Blob> {
        match self.backend.read(self.kind.storage_key())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Blob::new()),
        }
    }
}

impl<T: DeserializeOwned> ContentStore<T> {
    /// Look up `topic_id` for the interest set `labels`, with the reason on a miss
    pub fn lookup<S: AsRef<str>>(&self, topic_id: &str, labels: &[S]) -> Lookup<T> {
        let fingerprint = PreferenceFingerprint::from_labels(labels);
        let mut stats = self.lock();

        let outcome = match self.load() {
            Ok(mut blob) => match blob.remove(topic_id) {
                None => Lookup::Stale(StaleReason::Missing),
                Some(entry) => {
                    let now = self.clock.now();
                    match entry.staleness(&fingerprint, now, self.config.max_age_millis()) {
                        Some(reason) => Lookup::Stale(reason),
                        None => match serde_json::from_value::<T>(entry.content) {
                            Ok(content) => Lookup::Fresh(content),
                            Err(e) => {
                                warn!("Cached {} for {} does not decode: {}", self.kind, topic_id, e);
                                Lookup::Stale(StaleReason::Unreadable)
                            }
                        },
                    }
                }
            },
            Err(e) => {
                stats.storage_failures += 1;
                warn!("Error reading {} cache: {}", self.kind, e);
                Lookup::Stale(StaleReason::Unreadable)
            }
        };

        match &outcome {
            Lookup::Fresh(_) => {
                stats.hits += 1;
                debug!("Cache HIT for {}: {}", self.kind, topic_id);
            }
            Lookup::Stale(reason) => {
                stats.misses += 1;
                debug!("Cache MISS for {}: {} ({})", self.kind, topic_id, reason);
            }
        }

        outcome
    }

    /// Fresh content for `topic_id` and `labels`, if any
    pub fn get<S: AsRef<str>>(&self, topic_id: &str, labels: &[S]) -> Option<T> {
        self.lookup(topic_id, labels).into_option()
    }
}

impl<T: Serialize> ContentStore<T> {
    /// Store `content` for `topic_id`, generated for the interest set `labels`
    pub fn put<S: AsRef<str>>(&self, topic_id: &str, labels: &[S], content: &T) {
        let fingerprint = PreferenceFingerprint::from_labels(labels);
        let mut stats = self.lock();

        match self.write_entry(topic_id, fingerprint, content) {
            Ok(evicted) => {
                stats.writes += 1;
                stats.evictions += evicted.len() as u64;
                for key in &evicted {
                    info!("Evicted oldest {} cache entry: {}", self.kind, key);
                }
                debug!("Cached {}: {}", self.kind, topic_id);
            }
            Err(e) => {
                stats.storage_failures += 1;
                warn!("Error caching {} {}: {}", self.kind, topic_id, e);
            }
        }
    }

    /// Read-modify-write of the blob; nothing is persisted on error
    fn write_entry(
        &self,
        topic_id: &str,
        fingerprint: PreferenceFingerprint,
        content: &T,
    ) -> Result<Vec<TopicId>> {
        let content = serde_json::to_value(content)?;

        let mut blob = match self.load() {
            Ok(blob) => blob,
            Err(e) if e.is_corrupt_blob() => {
                warn!("Discarding unreadable {} cache blob: {}", self.kind, e);
                Blob::new()
            }
            Err(e) => return Err(e),
        };

        let mut evicted = Vec::new();
        if !blob.contains_key(topic_id) {
            // Exactly one pass unless max_entries shrank since the blob was written
            while blob.len() >= self.config.max_entries {
                let Some(oldest) = oldest_topic(&blob) else {
                    break;
                };
                blob.remove(&oldest);
                evicted.push(oldest);
            }
        }

        blob.insert(
            topic_id.to_string(),
            CacheEntry::new(content, fingerprint, self.clock.now()),
        );

        let raw = serde_json::to_string(&blob)?;
        self.backend.write(self.kind.storage_key(), &raw)?;

        Ok(evicted)
    }
}

/// Topic with the smallest `created_at`; the first in key order on ties
fn oldest_topic(blob: &Blob) -> Option<TopicId> {
    blob.iter()
        .min_by_key(|(_, entry)| entry.created_at)
        .map(|(topic, _)| topic.clone())
}
