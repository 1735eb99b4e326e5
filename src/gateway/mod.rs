//! Generation gateway - boundary over the hosted text-generation service
//!
//! Public interface:
//! - `GenerationGateway` - the injectable strategy every caller depends on
//! - `GenerationParams` / `ModelId` - pass-through call parameters
//! - `GeminiGateway` - the HTTP implementation
//!
//! The gateway never turns a failure into text. Callers decide what an
//! error becomes (a displayed reply, an evaluation row with no latency).

pub mod gemini;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub use gemini::GeminiGateway;

/// Lowest accepted temperature
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest accepted temperature
pub const MAX_TEMPERATURE: f32 = 1.0;
/// Lowest output-token budget offered
pub const MIN_MAX_TOKENS: u32 = 100;
/// Highest output-token budget offered
pub const MAX_MAX_TOKENS: u32 = 1000;
/// Granularity of the output-token budget
pub const MAX_TOKENS_STEP: u32 = 50;

/// Supported hosted models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Gemini15Flash, ModelId::Gemini15Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini15Flash => "gemini-1.5-flash",
            ModelId::Gemini15Pro => "gemini-1.5-pro",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ModelId::ALL.iter().map(|m| m.as_str()).collect();
                format!(
                    "unknown model '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// Parameters for a single generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub model: ModelId,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Build params, clamping the numeric knobs into their accepted ranges
    pub fn new(model: ModelId, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            temperature: clamp_temperature(temperature),
            max_tokens: clamp_max_tokens(max_tokens),
        }
    }
}

/// Clamp to [0, 1]; NaN falls back to the lower bound
pub fn clamp_temperature(value: f32) -> f32 {
    if value.is_nan() {
        MIN_TEMPERATURE
    } else {
        value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }
}

/// Clamp to [100, 1000] and snap to the nearest multiple of 50
pub fn clamp_max_tokens(value: u32) -> u32 {
    let clamped = value.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS);
    let snapped = (clamped + MAX_TOKENS_STEP / 2) / MAX_TOKENS_STEP * MAX_TOKENS_STEP;
    snapped.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}

/// A text-generation backend
///
/// Implementations block until the service answers, fails, or their own
/// timeout elapses.
pub trait GenerationGateway {
    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerationError>;
}
