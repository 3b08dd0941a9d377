//! Why a lookup did not produce a usable entry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a cached entry cannot serve a request.
///
/// None of these remove the entry: stale entries stay in place until a
/// write for the same topic overwrites them or eviction drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaleReason {
    /// No entry for the topic
    Missing,

    /// Entry was generated for a different interest set
    PreferencesChanged,

    /// Entry is older than the store's `max_age`
    Expired,

    /// Blob or entry could not be read back
    Unreadable,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::Missing => write!(f, "not cached"),
            StaleReason::PreferencesChanged => write!(f, "preferences changed"),
            StaleReason::Expired => write!(f, "expired"),
            StaleReason::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// Outcome of a store lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Fresh(T),
    Stale(StaleReason),
}

impl<T> Lookup<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    pub fn stale_reason(&self) -> Option<StaleReason> {
        match self {
            Lookup::Fresh(_) => None,
            Lookup::Stale(reason) => Some(*reason),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Fresh(value) => Some(value),
            Lookup::Stale(_) => None,
        }
    }
}
