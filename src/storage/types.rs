//! Domain types for the record store
//!
//! These types are storage-agnostic - they don't know about SQLite.
//! The store handles conversion to and from rows.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text layout of stored timestamps.
///
/// Fixed-width fractional part keeps lexical order equal to chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Render a timestamp the way the store persists it
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp (UTC, no offset suffix)
///
/// Accepts the bare `YYYY-MM-DD HH:MM:SS` form written by SQLite's
/// `CURRENT_TIMESTAMP` as well.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| naive.and_utc())
}

/// Origin tag of an interaction.
///
/// The three known roles are named; anything else round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    ReportAnalysis,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::ReportAnalysis => "report_analysis",
            Role::Other(tag) => tag,
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "report_analysis" => Role::ReportAnalysis,
            _ => Role::Other(tag),
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Role::from(tag.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged chat message or analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One benchmark prompt outcome
///
/// `latency` is `None` exactly when generation failed, in which case
/// `response` holds the error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: i64,
    pub prompt: String,
    pub response: String,
    pub latency: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl EvaluationRecord {
    /// True when this record carries a measured latency
    pub fn is_timed(&self) -> bool {
        self.latency.is_some()
    }
}
