//! Storage layer for medscope - SQLite record store
//!
//! Durable append-only log of two record kinds:
//! - interactions (chat messages, report analyses)
//! - evaluations (benchmark prompt outcomes with latency)
//!
//! The store exclusively owns persistence. Everything else works on copies
//! returned from queries.
//!
//! # Example
//!
//! ```no_run
//! use medscope::storage::{RecordStore, Role};
//!
//! let store = RecordStore::open(".medscope/data/medscope.db")?;
//! store.insert_interaction(&Role::User, "What causes a persistent cough?")?;
//! let newest_first = store.query_interactions()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod records;
pub mod types;

pub use records::RecordStore;
pub use types::{EvaluationRecord, InteractionRecord, Role};
