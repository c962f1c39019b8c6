//! Environment variable API key lookup.
//!
//! Read-only: keys are set via shell config or the deployment environment,
//! never written by this process. The value is wrapped in
//! [`secrecy::SecretString`] immediately so it cannot leak through Debug or
//! logging.

use secrecy::SecretString;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Read an API key from the environment.
///
/// Returns `None` when the variable is absent. A variable with invalid
/// Unicode is treated as absent rather than an error, since keys must be
/// valid strings.
pub fn load_api_key(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => None,
    }
}
