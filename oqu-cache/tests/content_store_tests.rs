//! Integration tests for content stores
//!
//! These tests exercise stores through their public API only:
//! - Persistence across store instances
//! - Eviction bound
//! - Blob format compatibility
//! - Kind isolation on a shared backend
//! - Concurrent writers

use chrono::{Duration, TimeZone, Utc};
use oqu_cache::{
    ContentKind, ContentStore, FileStorage, ManualClock, MemoryStorage, StaleReason,
    StorageBackend, StoreConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Payload {
    title: String,
    items: Vec<u32>,
}

fn payload(title: &str) -> Payload {
    Payload {
        title: title.to_string(),
        items: vec![1, 2, 3],
    }
}

fn fixed_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
    ))
}

#[test]
fn test_file_backed_store_survives_restart() {
    let tmp = TempDir::new().unwrap();

    {
        let store: ContentStore<Payload> = ContentStore::new(
            ContentKind::Lesson,
            StoreConfig::default(),
            Arc::new(FileStorage::new(tmp.path())),
        );
        store.put("g7-percentages", &["Football", "AI"], &payload("Percentages"));
    }

    let reopened: ContentStore<Payload> = ContentStore::new(
        ContentKind::Lesson,
        StoreConfig::default(),
        Arc::new(FileStorage::new(tmp.path())),
    );

    assert_eq!(
        reopened.get("g7-percentages", &["AI", "Football"]),
        Some(payload("Percentages"))
    );
    assert!(tmp.path().join("oqu_lesson_cache.json").exists());
}

#[test]
fn test_eviction_bound_with_max_plus_one_topics() {
    let max_entries = 5;
    let clock = fixed_clock();
    let store: ContentStore<Payload> = ContentStore::new(
        ContentKind::Quiz,
        StoreConfig::builder().max_entries(max_entries).build(),
        Arc::new(MemoryStorage::new()),
    )
    .with_clock(clock.clone());

    for i in 0..=max_entries {
        store.put(&format!("topic-{}", i), &["AI"], &payload("q"));
        clock.advance(Duration::seconds(1));
    }

    assert_eq!(store.len(), max_entries);
    assert!(store.get("topic-0", &["AI"]).is_none());
    assert!(!store.contains_topic("topic-0"));
    for i in 1..=max_entries {
        assert!(store.get(&format!("topic-{}", i), &["AI"]).is_some());
    }
}

#[test]
fn test_reads_blob_written_in_persisted_format() {
    let backend = Arc::new(MemoryStorage::new());
    backend
        .write(
            "oqu_quiz_cache",
            r#"{
                "g7-percentages": {
                    "content": {"title": "Percentages", "items": [4]},
                    "preferencesHash": "AI|Football",
                    "timestamp": 1700000000000
                }
            }"#,
        )
        .unwrap();

    let store: ContentStore<Payload> =
        ContentStore::new(ContentKind::Quiz, StoreConfig::default(), backend)
            .with_clock(fixed_clock());

    let hit = store.get("g7-percentages", &["Football", "AI"]).unwrap();
    assert_eq!(hit.items, vec![4]);
}

#[test]
fn test_expiry_with_default_max_age() {
    let clock = fixed_clock();
    let store: ContentStore<Payload> = ContentStore::new(
        ContentKind::Lesson,
        StoreConfig::default(),
        Arc::new(MemoryStorage::new()),
    )
    .with_clock(clock.clone());

    store.put("t1", &["AI"], &payload("a"));

    clock.advance(Duration::days(7) - Duration::milliseconds(1));
    assert!(store.get("t1", &["AI"]).is_some());

    clock.advance(Duration::milliseconds(2));
    assert_eq!(
        store.lookup("t1", &["AI"]).stale_reason(),
        Some(StaleReason::Expired)
    );
}

#[test]
fn test_kinds_are_isolated_on_shared_backend() {
    let backend: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
    let lessons: ContentStore<Payload> =
        ContentStore::new(ContentKind::Lesson, StoreConfig::default(), backend.clone());
    let quizzes: ContentStore<Payload> =
        ContentStore::new(ContentKind::Quiz, StoreConfig::default(), backend.clone());

    lessons.put("t1", &["AI"], &payload("lesson"));
    quizzes.put("t1", &["AI"], &payload("quiz"));

    assert_eq!(lessons.get("t1", &["AI"]).unwrap().title, "lesson");
    assert_eq!(quizzes.get("t1", &["AI"]).unwrap().title, "quiz");

    lessons.clear();
    assert!(lessons.get("t1", &["AI"]).is_none());
    assert!(quizzes.get("t1", &["AI"]).is_some());
    assert_eq!(backend.blob_count(), 1);
}

#[test]
fn test_undecodable_entry_is_a_miss_without_hiding_others() {
    let backend = Arc::new(MemoryStorage::new());
    backend
        .write(
            "oqu_lesson_cache",
            r#"{
                "bad": {"content": 42, "preferencesHash": "AI", "timestamp": 1700000000000},
                "good": {"content": {"title": "ok", "items": []}, "preferencesHash": "AI", "timestamp": 1700000000000}
            }"#,
        )
        .unwrap();

    let store: ContentStore<Payload> =
        ContentStore::new(ContentKind::Lesson, StoreConfig::default(), backend)
            .with_clock(fixed_clock());

    assert_eq!(
        store.lookup("bad", &["AI"]).stale_reason(),
        Some(StaleReason::Unreadable)
    );
    assert_eq!(store.get("good", &["AI"]).unwrap().title, "ok");
}

#[test]
fn test_concurrent_writers_respect_bound() {
    let max_entries = 8;
    let store: Arc<ContentStore<Payload>> = Arc::new(ContentStore::new(
        ContentKind::Lesson,
        StoreConfig::builder().max_entries(max_entries).build(),
        Arc::new(MemoryStorage::new()),
    ));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..10 {
                    store.put(&format!("w{}-t{}", worker, i), &["AI"], &payload("x"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), max_entries);
    let stats = store.stats();
    assert_eq!(stats.writes, 40);
    assert_eq!(stats.evictions, 40 - max_entries as u64);
}
