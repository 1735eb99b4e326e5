//! Deterministic gateways shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;

use medscope::{GenerationError, GenerationGateway, GenerationParams};

/// Echoes the prompt back
pub struct EchoGateway;

impl GenerationGateway for EchoGateway {
    fn generate(&self, prompt: &str, _: &GenerationParams) -> Result<String, GenerationError> {
        Ok(format!("echo: {}", prompt))
    }
}

/// Fails on the listed call indices (0-based), echoes otherwise
pub struct ScriptedGateway {
    fail_on: Vec<usize>,
    calls: Cell<usize>,
}

impl ScriptedGateway {
    pub fn failing_on(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl GenerationGateway for ScriptedGateway {
    fn generate(&self, prompt: &str, _: &GenerationParams) -> Result<String, GenerationError> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        if self.fail_on.contains(&index) {
            Err(GenerationError::Service {
                status: 429,
                message: "quota exceeded".to_string(),
            })
        } else {
            Ok(format!("answer {}: {}", index, prompt))
        }
    }
}
