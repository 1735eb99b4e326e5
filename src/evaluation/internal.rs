//! Internal implementation for the evaluation runner
//!
//! Metrics: per-prompt wall-clock latency, seconds, 2 decimals

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::PersistenceError;
use crate::gateway::{GenerationGateway, GenerationParams, ModelId};
use crate::storage::RecordStore;

use super::BENCHMARK_TEMPERATURE;

/// Outcome of one benchmark prompt, as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    /// Id of the stored evaluation row
    pub record_id: i64,
    pub prompt: String,
    /// Generated text, or `Error: <message>`
    pub response: String,
    /// Seconds; `None` when generation failed
    pub latency: Option<f64>,
}

impl EvaluationOutcome {
    pub fn failed(&self) -> bool {
        self.latency.is_none()
    }
}

/// Drives the gateway over a prompt set and logs every result
pub struct EvaluationRunner<'a> {
    store: &'a RecordStore,
    gateway: &'a dyn GenerationGateway,
}

impl<'a> EvaluationRunner<'a> {
    pub fn new(store: &'a RecordStore, gateway: &'a dyn GenerationGateway) -> Self {
        Self { store, gateway }
    }

    /// Run every prompt in order
    ///
    /// A generation failure is recorded and the run continues. A persistence
    /// failure stops the run and is returned.
    pub fn run<S: AsRef<str>>(
        &self,
        prompts: &[S],
        model: ModelId,
        max_tokens: u32,
    ) -> Result<Vec<EvaluationOutcome>, PersistenceError> {
        let params = GenerationParams::new(model, BENCHMARK_TEMPERATURE, max_tokens);
        info!(
            "starting evaluation run (prompts={}, model={}, max_tokens={})",
            prompts.len(),
            params.model,
            params.max_tokens
        );

        let mut outcomes = Vec::with_capacity(prompts.len());
        for (index, prompt) in prompts.iter().enumerate() {
            let prompt = prompt.as_ref();

            let start = Instant::now();
            let (response, latency) = match self.gateway.generate(prompt, &params) {
                Ok(text) => (text, Some(round_latency(start.elapsed()))),
                Err(e) => {
                    warn!("evaluation prompt failed (index={}, error={})", index, e);
                    (format!("Error: {}", e), None)
                }
            };

            let record_id = self.store.insert_evaluation(prompt, &response, latency)?;
            outcomes.push(EvaluationOutcome {
                record_id,
                prompt: prompt.to_string(),
                response,
                latency,
            });
        }

        let failures = outcomes.iter().filter(|o| o.failed()).count();
        info!(
            "evaluation run finished (prompts={}, failures={})",
            outcomes.len(),
            failures
        );
        Ok(outcomes)
    }
}

/// Elapsed seconds rounded to hundredths
pub(super) fn round_latency(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use std::cell::RefCell;

    /// Records the params it was called with and echoes the prompt
    struct RecordingGateway {
        calls: RefCell<Vec<GenerationParams>>,
    }

    impl GenerationGateway for RecordingGateway {
        fn generate(
            &self,
            prompt: &str,
            params: &GenerationParams,
        ) -> Result<String, GenerationError> {
            self.calls.borrow_mut().push(*params);
            Ok(format!("answer to: {}", prompt))
        }
    }

    #[test]
    fn test_round_latency() {
        assert_eq!(round_latency(Duration::from_millis(1234)), 1.23);
        assert_eq!(round_latency(Duration::from_millis(1236)), 1.24);
        assert_eq!(round_latency(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_benchmark_uses_fixed_temperature() -> anyhow::Result<()> {
        let store = RecordStore::open_in_memory()?;
        let gateway = RecordingGateway {
            calls: RefCell::new(Vec::new()),
        };
        let runner = EvaluationRunner::new(&store, &gateway);

        let outcomes = runner.run(&["a", "b"], ModelId::Gemini15Pro, 600)?;
        assert_eq!(outcomes.len(), 2);

        let calls = gateway.calls.borrow();
        assert_eq!(calls.len(), 2);
        for params in calls.iter() {
            assert_eq!(params.temperature, BENCHMARK_TEMPERATURE);
            assert_eq!(params.model, ModelId::Gemini15Pro);
            assert_eq!(params.max_tokens, 600);
        }
        Ok(())
    }

    #[test]
    fn test_empty_prompt_set() -> anyhow::Result<()> {
        let store = RecordStore::open_in_memory()?;
        let gateway = RecordingGateway {
            calls: RefCell::new(Vec::new()),
        };
        let prompts: [&str; 0] = [];
        let outcomes = EvaluationRunner::new(&store, &gateway).run(
            &prompts,
            ModelId::Gemini15Flash,
            400,
        )?;
        assert!(outcomes.is_empty());
        assert_eq!(store.evaluation_count()?, 0);
        Ok(())
    }
}
