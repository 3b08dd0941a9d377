//! Core type definitions for the content cache

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic identifier, the key inside one store
pub type TopicId = String;

/// Kind of generated content; each kind has its own store and blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Lesson,
    Quiz,
}

impl ContentKind {
    /// Fixed logical key of this kind's blob in the storage surface
    pub fn storage_key(&self) -> &'static str {
        match self {
            ContentKind::Lesson => "oqu_lesson_cache",
            ContentKind::Quiz => "oqu_quiz_cache",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Lesson => "lesson",
            ContentKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters for one store, kept in memory for the store's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that returned content
    pub hits: u64,

    /// Lookups that returned nothing
    pub misses: u64,

    /// Successful writes
    pub writes: u64,

    /// Entries dropped to admit a new topic
    pub evictions: u64,

    /// Reads or writes the storage surface refused
    pub storage_failures: u64,
}

impl CacheStats {
    /// Cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ hits: {}, misses: {}, hit_rate: {:.2}%, writes: {}, evictions: {}, storage_failures: {} }}",
            self.hits,
            self.misses,
            self.hit_rate(),
            self.writes,
            self.evictions,
            self.storage_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_distinct() {
        assert_eq!(ContentKind::Lesson.storage_key(), "oqu_lesson_cache");
        assert_eq!(ContentKind::Quiz.storage_key(), "oqu_quiz_cache");
        assert_eq!(ContentKind::Quiz.to_string(), "quiz");
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 75.0);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_stats_display() {
        let stats = CacheStats {
            hits: 10,
            misses: 5,
            writes: 5,
            evictions: 1,
            storage_failures: 0,
        };
        let display = stats.to_string();
        assert!(display.contains("hits: 10"));
        assert!(display.contains("evictions: 1"));
    }
}
