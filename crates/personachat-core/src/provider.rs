//! GenerationProvider trait definition.
//!
//! This is the abstraction the orchestrator calls to produce assistant
//! turns. Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in personachat-infra (e.g., `GeminiProvider`).

use personachat_types::error::GenerationError;
use personachat_types::persona::Persona;
use personachat_types::turn::Turn;

/// Everything a provider needs for one completion: the persona's generation
/// parameters plus the windowed turn history.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Ordered context turns. The leading system turn is carried separately
    /// in `system_prompt`; this sequence holds user/assistant turns only.
    pub turns: Vec<Turn>,
}

impl GenerationRequest {
    /// Build a request from a persona and an already-windowed history.
    pub fn for_persona(persona: &Persona, turns: Vec<Turn>) -> Self {
        Self {
            model: persona.model.clone(),
            system_prompt: persona.system_prompt.clone(),
            temperature: persona.temperature,
            top_p: persona.top_p,
            top_k: persona.top_k,
            max_output_tokens: persona.max_output_tokens,
            turns,
        }
    }
}

/// A completed generation: the full assistant reply.
///
/// There is no partial-result semantics; a call either fully succeeds with
/// a complete reply or fails.
#[derive(Debug, Clone)]
pub struct GenerationReply {
    pub content: String,
    /// Model that actually served the request, when the provider reports it.
    pub model: Option<String>,
}

/// Trait for generation provider backends.
///
/// Treated as fallible and slow: the orchestrator bounds every call with a
/// timeout and retries transient failures within a budget. Implementations
/// must not retry internally.
pub trait GenerationProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Produce the next assistant turn for the given request.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationReply, GenerationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use personachat_types::turn::TurnRole;

    #[test]
    fn test_request_carries_persona_parameters() {
        let persona = Persona {
            key: "coder".to_string(),
            name: "Technical Code Assistant".to_string(),
            system_prompt: "You are a senior engineer.".to_string(),
            temperature: 0.2,
            top_p: 0.7,
            top_k: 30,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 4_096,
            history_window: Some(6),
        };
        let turns = vec![Turn::now(TurnRole::User, "explain lifetimes")];
        let request = GenerationRequest::for_persona(&persona, turns);

        assert_eq!(request.model, "gemini-2.0-flash");
        assert_eq!(request.system_prompt, "You are a senior engineer.");
        assert!((request.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(request.top_k, 30);
        assert_eq!(request.turns.len(), 1);
    }
}
