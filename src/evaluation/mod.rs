//! Evaluation runner - benchmark the hosted model over a fixed prompt set
//!
//! Public interface:
//! - `EvaluationRunner::run()` - one evaluation run, every outcome persisted
//! - `BENCHMARK_PROMPTS` - the fixed prompt set
//! - `EvaluationOutcome` - per-prompt result
//!
//! Failures are per prompt: the run always covers the whole set.

mod internal;

pub use internal::{EvaluationOutcome, EvaluationRunner};

/// Sampling temperature for benchmark runs, below the interactive default
/// to reduce variance between runs
pub const BENCHMARK_TEMPERATURE: f32 = 0.2;

/// The fixed benchmark prompt set, in run order
pub const BENCHMARK_PROMPTS: [&str; 4] = [
    "What are the possible causes of persistent cough?",
    "Explain the difference between type 1 and type 2 diabetes.",
    "List common side effects of ibuprofen.",
    "Summarize symptoms of hypertension in under 50 words.",
];
