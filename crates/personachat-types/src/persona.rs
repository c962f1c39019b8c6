//! Persona definition: a named bundle of system prompt and generation
//! parameters.

use serde::{Deserialize, Serialize};

/// A named configuration of system prompt, temperature, and model
/// parameters.
///
/// Personas are immutable after catalog load. Identity is `key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Unique catalog key (e.g., "analyst").
    pub key: String,
    /// Human-readable name (e.g., "Data Analyst Expert").
    pub name: String,
    /// System prompt that seeds every session with this persona.
    pub system_prompt: String,
    /// Sampling temperature in [0, 1].
    pub temperature: f64,
    /// Nucleus sampling parameter.
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Top-k sampling parameter.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens the provider may generate per reply.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Per-persona context window override: how many recent user/assistant
    /// turns to send alongside the system turn. `None` uses the global
    /// default.
    #[serde(default)]
    pub history_window: Option<usize>,
}

fn default_top_p() -> f64 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_output_tokens() -> u32 {
    2_048
}

impl Persona {
    /// Validate a persona definition loaded from configuration.
    ///
    /// Failures here are fatal at startup, never deferred to request time.
    pub fn validate(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("persona key must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err(format!("persona '{}': name must not be empty", self.key));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(format!(
                "persona '{}': system_prompt must not be empty",
                self.key
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "persona '{}': temperature {} outside [0, 1]",
                self.key, self.temperature
            ));
        }
        Ok(())
    }
}
