//! Wire types and response decoding for the Gemini REST API

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::gateway::GenerationParams;

/// Body of `POST /models/{model}:generateContent`
#[derive(Debug, Serialize)]
pub(super) struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(prompt: &'a str, params: &GenerationParams) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract reply text from a successful response body
///
/// Concatenates every text part of the first candidate.
pub(super) fn parse_reply(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("undecodable body: {}", e)))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({})", r))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(GenerationError::InvalidResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("empty reply (finish reason {})", r))
            .unwrap_or_else(|| "empty reply".to_string());
        return Err(GenerationError::InvalidResponse(reason));
    }

    Ok(text)
}

/// Build the error for a non-success status, preferring the service's own message
pub(super) fn service_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    GenerationError::Service { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ModelId;

    #[test]
    fn test_request_shape() {
        let params = GenerationParams::new(ModelId::Gemini15Flash, 0.2, 400);
        let body = serde_json::to_value(GenerateRequest::new("hello", &params)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 400);
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_reply_concatenates_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Common causes "}, {"text": "include asthma."}], "role": "model"},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(parse_reply(body).unwrap(), "Common causes include asthma.");
    }

    #[test]
    fn test_parse_reply_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_reply(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_reply_empty_candidate() {
        let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let err = parse_reply(body).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_service_error_prefers_api_message() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        match service_error(429, body) {
            GenerationError::Service { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match service_error(502, "Bad Gateway\n") {
            GenerationError::Service { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
