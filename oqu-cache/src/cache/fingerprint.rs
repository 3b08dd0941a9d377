//! Order-independent identity for a learner's interest set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between sorted labels
pub const SEPARATOR: &str = "|";

/// Stable identity string for an unordered set of interest labels.
///
/// Labels are sorted by ordinal comparison, deduplicated and joined with
/// [`SEPARATOR`]. The empty set yields the empty fingerprint, which is a
/// valid value of its own ("no preferences").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceFingerprint(String);

impl PreferenceFingerprint {
    /// Compute the fingerprint of a label list
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut sorted: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        sorted.dedup();
        Self(sorted.join(SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PreferenceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`PreferenceFingerprint::from_labels`]
pub fn fingerprint<S: AsRef<str>>(labels: &[S]) -> PreferenceFingerprint {
    PreferenceFingerprint::from_labels(labels)
}
