//! CSV exports of benchmark results and the evaluation log
//!
//! Both formats carry a header row naming the displayed columns. A missing
//! latency is an empty field.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::evaluation::EvaluationOutcome;
use crate::storage::types::{format_timestamp, parse_timestamp};
use crate::storage::EvaluationRecord;

pub const RUN_RESULTS_HEADER: [&str; 3] = ["Prompt", "AI Response", "Response Time (s)"];
pub const EVALUATION_LOG_HEADER: [&str; 5] = ["id", "prompt", "response", "latency", "timestamp"];

/// One row of an evaluation-run export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResultRow {
    #[serde(rename = "Prompt")]
    pub prompt: String,
    #[serde(rename = "AI Response")]
    pub response: String,
    #[serde(rename = "Response Time (s)")]
    pub latency: Option<f64>,
}

impl From<&EvaluationOutcome> for RunResultRow {
    fn from(outcome: &EvaluationOutcome) -> Self {
        Self {
            prompt: outcome.prompt.clone(),
            response: outcome.response.clone(),
            latency: outcome.latency,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EvaluationLogRow {
    id: i64,
    prompt: String,
    response: String,
    latency: Option<f64>,
    timestamp: String,
}

pub fn write_run_results<W: Write>(
    writer: W,
    outcomes: &[EvaluationOutcome],
) -> Result<(), ExportError> {
    let mut out = WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(RUN_RESULTS_HEADER)?;
    for outcome in outcomes {
        out.serialize(RunResultRow::from(outcome))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn parse_run_results<R: Read>(reader: R) -> Result<Vec<RunResultRow>, ExportError> {
    let mut input = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut rows = Vec::new();
    for row in input.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Full evaluation log, in the order given
pub fn write_evaluation_log<W: Write>(
    writer: W,
    records: &[EvaluationRecord],
) -> Result<(), ExportError> {
    let mut out = WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(EVALUATION_LOG_HEADER)?;
    for record in records {
        out.serialize(EvaluationLogRow {
            id: record.id,
            prompt: record.prompt.clone(),
            response: record.response.clone(),
            latency: record.latency,
            timestamp: format_timestamp(&record.timestamp),
        })?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn parse_evaluation_log<R: Read>(reader: R) -> Result<Vec<EvaluationRecord>, ExportError> {
    let mut input = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut records = Vec::new();
    for row in input.deserialize() {
        let row: EvaluationLogRow = row?;
        let timestamp = parse_timestamp(&row.timestamp)
            .map_err(|_| ExportError::Timestamp(row.timestamp.clone()))?;
        records.push(EvaluationRecord {
            id: row.id,
            prompt: row.prompt,
            response: row.response,
            latency: row.latency,
            timestamp,
        });
    }
    Ok(records)
}

/// Evaluation log rendered to an in-memory CSV string
pub fn evaluation_log_to_string(records: &[EvaluationRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_evaluation_log(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}
