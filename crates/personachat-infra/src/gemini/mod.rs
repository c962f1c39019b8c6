//! GeminiProvider -- concrete [`GenerationProvider`] implementation for the
//! Google Gemini `generateContent` API.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output. The provider performs no internal retries;
//! the orchestrator owns the timeout and retry budget, and this layer only
//! classifies failures as transient or permanent.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use personachat_core::provider::{GenerationProvider, GenerationReply, GenerationRequest};
use personachat_types::error::GenerationError;

use types::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
    content_from_turn,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini generation provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// The reqwest client carries a generous transport timeout; the tight
    /// per-call bound is the orchestrator's.
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (testing, proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn to_gemini_request(request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request.system_prompt.clone(),
                }],
            }),
            contents: request.turns.iter().map(content_from_turn).collect(),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                top_k: request.top_k,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

/// Classify an HTTP error status into the generation error taxonomy.
fn map_status(status: u16, body: String) -> GenerationError {
    match status {
        400 | 404 | 422 => GenerationError::InvalidRequest(body),
        401 | 403 => GenerationError::AuthenticationFailed,
        429 => GenerationError::RateLimited {
            retry_after_ms: None,
        },
        500..=599 => GenerationError::Overloaded(body),
        _ => GenerationError::Network(format!("HTTP {status}: {body}")),
    }
}

/// Extract the reply text from a parsed response, or classify the refusal.
fn extract_reply(response: GeminiResponse) -> Result<GenerationReply, GenerationError> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(GenerationError::ContentBlocked(reason.clone()));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::ContentBlocked("no candidates returned".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason.eq_ignore_ascii_case("safety") {
            return Err(GenerationError::ContentBlocked(reason.to_string()));
        }
    }

    let content = candidate.content.ok_or_else(|| {
        GenerationError::Deserialization("candidate without content".to_string())
    })?;

    let text: String = content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        return Err(GenerationError::Deserialization(
            "candidate with empty text".to_string(),
        ));
    }

    Ok(GenerationReply {
        content: text,
        model: response.model_version,
    })
}

// GeminiProvider intentionally does not derive Debug; the SecretString
// field already redacts the key, omitting Debug avoids leaking the rest.

impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, GenerationError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        debug!(model = %request.model, turns = request.turns.len(), "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(0)
                } else {
                    GenerationError::Network(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), error_body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(format!("failed to parse response: {e}")))?;

        extract_reply(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personachat_types::persona::Persona;
    use personachat_types::turn::{Turn, TurnRole};

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(401, String::new()),
            GenerationError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status(400, String::new()),
            GenerationError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_status(429, String::new()),
            GenerationError::RateLimited { .. }
        ));
        assert!(matches!(
            map_status(503, String::new()),
            GenerationError::Overloaded(_)
        ));

        // Retryability flows from the classification.
        assert!(map_status(429, String::new()).is_transient());
        assert!(map_status(500, String::new()).is_transient());
        assert!(!map_status(403, String::new()).is_transient());
        assert!(!map_status(400, String::new()).is_transient());
    }

    #[test]
    fn test_extract_reply_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hel"}, {"text": "lo"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let reply = extract_reply(resp).unwrap();
        assert_eq!(reply.content, "Hello");
    }

    #[test]
    fn test_extract_reply_blocked_prompt_is_permanent() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = extract_reply(resp).unwrap_err();
        assert!(matches!(err, GenerationError::ContentBlocked(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_extract_reply_safety_finish_is_blocked() {
        let json = r#"{
            "candidates": [{"finishReason": "SAFETY"}]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_reply(resp).unwrap_err(),
            GenerationError::ContentBlocked(_)
        ));
    }

    #[test]
    fn test_request_mapping_carries_history_and_params() {
        let persona = Persona {
            key: "analyst".to_string(),
            name: "Data Analyst Expert".to_string(),
            system_prompt: "You are an analyst.".to_string(),
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 2_048,
            history_window: None,
        };
        let turns = vec![
            Turn::now(TurnRole::User, "q1"),
            Turn::now(TurnRole::Assistant, "a1"),
            Turn::now(TurnRole::User, "q2"),
        ];
        let request = GenerationRequest::for_persona(&persona, turns);
        let wire = GeminiProvider::to_gemini_request(&request);

        assert_eq!(wire.contents.len(), 3);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
        assert_eq!(wire.contents[1].role.as_deref(), Some("model"));
        assert_eq!(
            wire.system_instruction.unwrap().parts[0].text,
            "You are an analyst."
        );
        assert!((wire.generation_config.temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_url_includes_model() {
        let provider = GeminiProvider::new(SecretString::from("test-key"))
            .with_base_url("http://localhost:9999".to_string());
        assert_eq!(
            provider.url("gemini-2.0-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
