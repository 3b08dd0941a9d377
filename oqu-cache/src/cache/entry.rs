//! Cache entry with preference fingerprint and creation time

use crate::cache::fingerprint::PreferenceFingerprint;
use crate::cache::invalidation::StaleReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached artifact for one topic.
///
/// Serialized with the field names of the persisted blob format:
/// `{"content": .., "preferencesHash": "..", "timestamp": <epoch ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The generated artifact
    pub content: T,

    /// Fingerprint of the interest set the artifact was generated for
    #[serde(rename = "preferencesHash")]
    pub fingerprint: PreferenceFingerprint,

    /// When the entry was written
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(content: T, fingerprint: PreferenceFingerprint, created_at: DateTime<Utc>) -> Self {
        Self {
            content,
            fingerprint,
            created_at,
        }
    }

    /// Age in milliseconds at `now`; negative if the clock went backwards
    pub fn age_millis(&self, now: DateTime<Utc>) -> i128 {
        (now - self.created_at).num_milliseconds() as i128
    }

    /// Strictly older than `max_age_millis`
    pub fn is_expired(&self, now: DateTime<Utc>, max_age_millis: i128) -> bool {
        self.age_millis(now) > max_age_millis
    }

    /// Why this entry cannot serve a request with `fingerprint` at `now`.
    ///
    /// A fingerprint mismatch wins over expiry.
    pub fn staleness(
        &self,
        fingerprint: &PreferenceFingerprint,
        now: DateTime<Utc>,
        max_age_millis: i128,
    ) -> Option<StaleReason> {
        if &self.fingerprint != fingerprint {
            Some(StaleReason::PreferencesChanged)
        } else if self.is_expired(now, max_age_millis) {
            Some(StaleReason::Expired)
        } else {
            None
        }
    }
}
