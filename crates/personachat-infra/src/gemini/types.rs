//! Request/response DTOs for the Gemini `generateContent` API.
//!
//! Field names follow the wire format (camelCase). Conversation roles map
//! as user -> "user", assistant -> "model"; the system prompt travels in
//! `systemInstruction`, not in `contents`.

use serde::{Deserialize, Serialize};

use personachat_types::turn::{Turn, TurnRole};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    pub contents: Vec<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Map a conversation turn to a Gemini content entry.
pub fn content_from_turn(turn: &Turn) -> GeminiContent {
    let role = match turn.role {
        TurnRole::Assistant => "model",
        // System turns never reach `contents`; treating one as "user" is a
        // safe degradation rather than a wire error.
        TurnRole::User | TurnRole::System => "user",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart {
            text: turn.content.clone(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: "You are an analyst.".to_string(),
                }],
            }),
            contents: vec![],
            generation_config: GeminiGenerationConfig {
                temperature: 0.3,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 2_048,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"topP\""));
        assert!(json.contains("\"maxOutputTokens\""));
    }

    #[test]
    fn test_assistant_turn_maps_to_model_role() {
        let turn = Turn::now(TurnRole::Assistant, "an answer");
        let content = content_from_turn(&turn);
        assert_eq!(content.role.as_deref(), Some("model"));
        assert_eq!(content.parts[0].text, "an answer");
    }

    #[test]
    fn test_response_deserializes_candidates() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello!"}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.0-flash"
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.candidates.len(), 1);
        assert_eq!(
            resp.candidates[0].content.as_ref().unwrap().parts[0].text,
            "Hello!"
        );
        assert_eq!(resp.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_response_deserializes_block_feedback() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(resp.candidates.is_empty());
        assert_eq!(
            resp.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
