//! Record store properties on an on-disk database

use std::collections::HashSet;

use medscope::storage::types::parse_timestamp;
use medscope::{RecordStore, Role};
use tempfile::TempDir;

#[test]
fn test_query_returns_every_insert_newest_first() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let store = RecordStore::open(temp.path().join("log.db"))?;

    for n in [0usize, 1, 7, 40] {
        let before = store.interaction_count()?;
        for i in 0..n {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            store.insert_interaction(&role, &format!("message {}", i))?;
        }
        let records = store.query_interactions()?;
        assert_eq!(records.len(), before + n);

        let ids: HashSet<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), records.len());

        for pair in records.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
            if pair[0].timestamp == pair[1].timestamp {
                assert!(pair[0].id > pair[1].id);
            }
        }
    }
    Ok(())
}

#[test]
fn test_initialize_twice_keeps_records() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("nested").join("log.db");

    let store = RecordStore::open(&path)?;
    store.insert_interaction(&Role::User, "hello")?;
    store.insert_evaluation("p", "r", Some(0.8))?;
    store.initialize()?;
    store.initialize()?;
    drop(store);

    let reopened = RecordStore::open(&path)?;
    assert_eq!(reopened.interaction_count()?, 1);
    assert_eq!(reopened.evaluation_count()?, 1);
    assert_eq!(reopened.query_evaluations()?[0].latency, Some(0.8));
    Ok(())
}

#[test]
fn test_timestamps_are_store_assigned() -> anyhow::Result<()> {
    let store = RecordStore::open_in_memory()?;
    let before = chrono::Utc::now();
    store.insert_interaction(&Role::ReportAnalysis, "analysis")?;
    let after = chrono::Utc::now();

    let record = &store.query_interactions()?[0];
    assert_eq!(record.role, Role::ReportAnalysis);
    // Stored with microsecond precision
    let lower = parse_timestamp(&before.format("%Y-%m-%d %H:%M:%S%.6f").to_string())?;
    assert!(record.timestamp >= lower);
    assert!(record.timestamp <= after);
    Ok(())
}
