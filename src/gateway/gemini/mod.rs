//! Gemini gateway over the hosted REST API (blocking, bounded wait)

mod internal;

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;

use crate::error::GenerationError;
use crate::gateway::{GenerationGateway, GenerationParams};

/// Default REST endpoint root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// HTTP client for `models/{model}:generateContent`
pub struct GeminiGateway {
    base_url: String,
    api_key: String,
    timeout: Duration,
    http: HttpClient,
}

impl GeminiGateway {
    /// Create a gateway with an explicit key
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
            http,
        })
    }

    /// Create a gateway reading the key from environment variable `key_env`
    pub fn from_env(
        key_env: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(key_env.to_string()))?;
        Self::new(api_key, base_url, timeout)
    }

    fn endpoint(&self, params: &GenerationParams) -> String {
        format!("{}/models/{}:generateContent", self.base_url, params.model)
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                after: self.timeout,
            }
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

impl GenerationGateway for GeminiGateway {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerationError> {
        let url = self.endpoint(params);
        debug!(
            "generateContent (model={}, temperature={}, max_tokens={}, prompt_chars={})",
            params.model,
            params.temperature,
            params.max_tokens,
            prompt.chars().count()
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&internal::GenerateRequest::new(prompt, params))
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(
                "generateContent failed (model={}, status={})",
                params.model, status
            );
            return Err(internal::service_error(status.as_u16(), &body));
        }

        internal::parse_reply(&body)
    }
}
