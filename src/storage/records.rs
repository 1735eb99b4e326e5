//! Append-only record store on SQLite
//!
//! Two tables, `interactions` and `evaluations`. Rows are written once and
//! never updated or deleted. Timestamps and ids are assigned here, never by
//! the caller.

use std::path::Path;

use chrono::Utc;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::PersistenceError;
use crate::storage::types::{
    format_timestamp, parse_timestamp, EvaluationRecord, InteractionRecord, Role,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS interactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        role TEXT NOT NULL,
        content TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS evaluations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        prompt TEXT NOT NULL,
        response TEXT NOT NULL,
        latency REAL,
        timestamp TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_interactions_timestamp ON interactions(timestamp);
    CREATE INDEX IF NOT EXISTS idx_evaluations_timestamp ON evaluations(timestamp);
";

/// Owned handle to the interaction/evaluation log.
///
/// One instance per application session; components borrow it.
/// Not shared across threads: a second writer needs its own handle.
pub struct RecordStore {
    db: Connection,
}

impl RecordStore {
    /// Open (or create) the store at `path` and ensure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Connection::open(path).map_err(|source| PersistenceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // Each insert is its own committed transaction; FULL syncs it to disk
        db.execute_batch("PRAGMA synchronous = FULL;")?;

        let store = Self { db };
        store.initialize()?;
        info!("opened record store (path={})", path.display());
        Ok(store)
    }

    /// Private in-memory store, gone when dropped
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let store = Self {
            db: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure both tables exist. Safe to call any number of times.
    pub fn initialize(&self) -> Result<(), PersistenceError> {
        self.db.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Append an interaction and return its id
    pub fn insert_interaction(&self, role: &Role, content: &str) -> Result<i64, PersistenceError> {
        let timestamp = format_timestamp(&Utc::now());
        let id: i64 = self.db.query_row(
            "INSERT INTO interactions (role, content, timestamp)
             VALUES (?1, ?2, ?3)
             RETURNING id",
            params![role.as_str(), content, timestamp],
            |row| row.get(0),
        )?;
        debug!("inserted interaction (id={}, role={})", id, role);
        Ok(id)
    }

    /// Append an evaluation result and return its id
    ///
    /// `latency` is `None` when the generation call failed.
    pub fn insert_evaluation(
        &self,
        prompt: &str,
        response: &str,
        latency: Option<f64>,
    ) -> Result<i64, PersistenceError> {
        let timestamp = format_timestamp(&Utc::now());
        let id: i64 = self.db.query_row(
            "INSERT INTO evaluations (prompt, response, latency, timestamp)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
            params![prompt, response, latency, timestamp],
            |row| row.get(0),
        )?;
        debug!(
            "inserted evaluation (id={}, timed={})",
            id,
            latency.is_some()
        );
        Ok(id)
    }

    /// All interactions, newest first
    pub fn query_interactions(&self) -> Result<Vec<InteractionRecord>, PersistenceError> {
        let mut stmt = self.db.prepare(
            "SELECT id, role, content, timestamp FROM interactions
             ORDER BY timestamp DESC, id DESC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(InteractionRecord {
                    id: row.get(0)?,
                    role: Role::from(row.get::<_, String>(1)?),
                    content: row.get(2)?,
                    timestamp: timestamp_column(row, 3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// All evaluations, newest first
    pub fn query_evaluations(&self) -> Result<Vec<EvaluationRecord>, PersistenceError> {
        let mut stmt = self.db.prepare(
            "SELECT id, prompt, response, latency, timestamp FROM evaluations
             ORDER BY timestamp DESC, id DESC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(EvaluationRecord {
                    id: row.get(0)?,
                    prompt: row.get(1)?,
                    response: row.get(2)?,
                    latency: row.get(3)?,
                    timestamp: timestamp_column(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Number of stored interactions
    pub fn interaction_count(&self) -> Result<usize, PersistenceError> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored evaluations
    pub fn evaluation_count(&self) -> Result<usize, PersistenceError> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM evaluations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Read a stored timestamp column, reporting bad text as a conversion failure
fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_record_store_creation() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let store = RecordStore::open(temp.path().join("data").join("medscope.db"))?;
        assert_eq!(store.interaction_count()?, 0);
        assert_eq!(store.evaluation_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_interactions_newest_first_with_unique_ids() -> anyhow::Result<()> {
        let store = RecordStore::open_in_memory()?;
        let n = 25;
        for i in 0..n {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            store.insert_interaction(&role, &format!("message {}", i))?;
        }

        let records = store.query_interactions()?;
        assert_eq!(records.len(), n);

        let ids: HashSet<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), n);

        for pair in records.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
            if pair[0].timestamp == pair[1].timestamp {
                assert!(pair[0].id > pair[1].id);
            }
        }
        assert_eq!(records[0].content, "message 24");
        assert_eq!(records[n - 1].content, "message 0");
        Ok(())
    }

    #[test]
    fn test_initialize_is_idempotent() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("medscope.db");

        let store = RecordStore::open(&path)?;
        store.insert_interaction(&Role::User, "persistent cough")?;
        store.insert_evaluation("prompt", "response", Some(1.25))?;
        store.initialize()?;
        store.initialize()?;
        assert_eq!(store.interaction_count()?, 1);
        assert_eq!(store.evaluation_count()?, 1);
        drop(store);

        // Reopening runs initialize() again on existing tables
        let reopened = RecordStore::open(&path)?;
        let interactions = reopened.query_interactions()?;
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].content, "persistent cough");
        assert_eq!(reopened.evaluation_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_evaluation_latency_absent_roundtrip() -> anyhow::Result<()> {
        let store = RecordStore::open_in_memory()?;
        let ok = store.insert_evaluation("q1", "answer", Some(0.42))?;
        let failed = store.insert_evaluation("q2", "Error: quota", None)?;
        assert!(failed > ok);

        let records = store.query_evaluations()?;
        let by_id = |id: i64| records.iter().find(|r| r.id == id).unwrap();
        assert_eq!(by_id(ok).latency, Some(0.42));
        assert!(by_id(ok).is_timed());
        assert_eq!(by_id(failed).latency, None);
        assert_eq!(by_id(failed).response, "Error: quota");
        Ok(())
    }

    #[test]
    fn test_custom_role_is_preserved() -> anyhow::Result<()> {
        let store = RecordStore::open_in_memory()?;
        store.insert_interaction(&Role::from("triage_note"), "escalate")?;
        let records = store.query_interactions()?;
        assert_eq!(records[0].role, Role::Other("triage_note".to_string()));
        Ok(())
    }

    #[test]
    fn test_records_survive_reopen_without_explicit_flush() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("medscope.db");
        {
            let store = RecordStore::open(&path)?;
            store.insert_interaction(&Role::ReportAnalysis, "Summary: normal")?;
        }
        let store = RecordStore::open(&path)?;
        assert_eq!(store.query_interactions()?[0].role, Role::ReportAnalysis);
        Ok(())
    }
}
