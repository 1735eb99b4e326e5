//! Analytics aggregator - derived statistics over a snapshot of records
//!
//! Every function here is pure: it takes records already queried from the
//! store and returns a value. Nothing is persisted.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::storage::{EvaluationRecord, InteractionRecord, Role};

/// Interaction count per UTC calendar date.
///
/// Sparse: dates with no interactions are absent.
pub fn daily_interaction_counts(
    interactions: &[InteractionRecord],
) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for record in interactions {
        *counts.entry(record.timestamp.date_naive()).or_insert(0) += 1;
    }
    counts
}

/// One equal-width latency bucket. `end` is exclusive except for the last bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyBucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of measured latencies
///
/// Records without a usable latency are left out entirely. The range is
/// [min, max]; a single distinct value widens it to [v - 0.5, v + 0.5].
/// Returns no buckets when `bucket_count` is 0 or nothing was timed.
pub fn latency_histogram(
    evaluations: &[EvaluationRecord],
    bucket_count: usize,
) -> Vec<LatencyBucket> {
    let latencies = timed_latencies(evaluations);
    if bucket_count == 0 || latencies.is_empty() {
        return Vec::new();
    }

    let mut lo = latencies.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bucket_count as f64;

    let mut buckets: Vec<LatencyBucket> = (0..bucket_count)
        .map(|i| LatencyBucket {
            start: lo + width * i as f64,
            end: if i + 1 == bucket_count {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for latency in latencies {
        let index = (((latency - lo) / width) as usize).min(bucket_count - 1);
        buckets[index].count += 1;
    }
    buckets
}

/// A user query and how often it was asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFrequency {
    pub content: String,
    pub count: usize,
}

/// The `k` most frequent user queries, by exact content
///
/// Sorted by count descending. Equal counts keep the order in which the
/// content first appears in `interactions`.
pub fn top_queries(interactions: &[InteractionRecord], k: usize) -> Vec<QueryFrequency> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in interactions.iter().filter(|r| r.role == Role::User) {
        let content = record.content.as_str();
        let count = counts.entry(content).or_insert_with(|| {
            first_seen.push(content);
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<QueryFrequency> = first_seen
        .into_iter()
        .map(|content| QueryFrequency {
            content: content.to_string(),
            count: counts[content],
        })
        .collect();
    // Stable sort keeps first-seen order among ties
    ranked.sort_by_key(|q| Reverse(q.count));
    ranked.truncate(k);
    ranked
}

/// Latency statistics over the timed evaluations
///
/// `count`, `mean_latency`, `min_latency` and `max_latency` only consider
/// records with a finite latency. With none, the three statistics are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    /// Every evaluation record in the snapshot
    pub total_records: usize,
    /// Records with a measured latency
    pub count: usize,
    /// Records without a usable latency (generation failed)
    pub failures: usize,
    pub mean_latency: Option<f64>,
    pub min_latency: Option<f64>,
    pub max_latency: Option<f64>,
}

pub fn evaluation_summary(evaluations: &[EvaluationRecord]) -> EvaluationSummary {
    let latencies = timed_latencies(evaluations);
    let count = latencies.len();

    let (mean_latency, min_latency, max_latency) = if latencies.is_empty() {
        (None, None, None)
    } else {
        let sum: f64 = latencies.iter().sum();
        (
            Some(sum / count as f64),
            Some(latencies.iter().copied().fold(f64::INFINITY, f64::min)),
            Some(latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        )
    };

    EvaluationSummary {
        total_records: evaluations.len(),
        count,
        failures: evaluations.len() - count,
        mean_latency,
        min_latency,
        max_latency,
    }
}

/// Latencies both aggregates agree on: present and finite
fn timed_latencies(evaluations: &[EvaluationRecord]) -> Vec<f64> {
    evaluations
        .iter()
        .filter_map(|e| e.latency)
        .filter(|l| l.is_finite())
        .collect()
}

/// Everything the analytics view shows, computed from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsOverview {
    pub daily_counts: BTreeMap<NaiveDate, usize>,
    pub latency_histogram: Vec<LatencyBucket>,
    pub top_queries: Vec<QueryFrequency>,
    pub summary: EvaluationSummary,
}

impl AnalyticsOverview {
    pub fn compute(
        interactions: &[InteractionRecord],
        evaluations: &[EvaluationRecord],
        top_k: usize,
        bucket_count: usize,
    ) -> Self {
        Self {
            daily_counts: daily_interaction_counts(interactions),
            latency_histogram: latency_histogram(evaluations, bucket_count),
            top_queries: top_queries(interactions, top_k),
            summary: evaluation_summary(evaluations),
        }
    }
}

/// Summary block of the test report, keyed the way the report displays it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReportSummary {
    #[serde(rename = "Total Evaluations")]
    pub total: usize,
    #[serde(rename = "Timed Evaluations")]
    pub timed: usize,
    #[serde(rename = "Failed Evaluations")]
    pub failed: usize,
    #[serde(rename = "Average Latency (s)")]
    pub average_latency: Option<f64>,
    #[serde(rename = "Fastest Response (s)")]
    pub fastest: Option<f64>,
    #[serde(rename = "Slowest Response (s)")]
    pub slowest: Option<f64>,
}

impl From<&EvaluationSummary> for TestReportSummary {
    fn from(summary: &EvaluationSummary) -> Self {
        Self {
            total: summary.total_records,
            timed: summary.count,
            failed: summary.failures,
            average_latency: summary.mean_latency.map(round2),
            fastest: summary.min_latency.map(round2),
            slowest: summary.max_latency.map(round2),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
