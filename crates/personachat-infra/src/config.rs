//! Configuration and persona catalog loading.
//!
//! `config.toml` lives in the data directory and is forgiving: a missing
//! file yields defaults, a malformed one logs a warning and yields defaults.
//! Persona definitions are the opposite: any invalid entry is fatal at
//! startup, never deferred to request time.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use personachat_types::config::AppConfig;
use personachat_types::error::CatalogError;
use personachat_types::persona::Persona;

/// Resolve the data directory: `PERSONACHAT_DATA_DIR`, falling back to
/// `~/.personachat`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("PERSONACHAT_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".personachat")
        }
    }
}

/// Database URL for the SQLite file inside the data directory.
pub fn database_url(data_dir: &Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join("personachat.db").display()
    )
}

/// Load `{data_dir}/config.toml`.
///
/// - Missing file: returns [`AppConfig::default()`].
/// - Malformed file: logs a warning and returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonasFile {
    personas: Vec<Persona>,
}

/// Load persona definitions.
///
/// When `config.personas_file` is set, the file must exist and parse; any
/// failure is fatal. Otherwise the built-in catalog is returned.
pub async fn load_personas(config: &AppConfig) -> Result<Vec<Persona>, CatalogError> {
    let Some(path) = &config.personas_file else {
        return Ok(builtin_personas());
    };

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        CatalogError::InvalidPersona(format!("cannot read personas file '{path}': {e}"))
    })?;

    let parsed: PersonasFile = toml::from_str(&content).map_err(|e| {
        CatalogError::InvalidPersona(format!("cannot parse personas file '{path}': {e}"))
    })?;

    Ok(parsed.personas)
}

/// The built-in persona catalog.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            key: "analyst".to_string(),
            name: "Data Analyst Expert".to_string(),
            system_prompt: "You are an experienced data analyst with ten years in the field. \
                Answer precisely, fact-based, and in detail. Use technical terms but explain \
                them. Give concrete examples and use cases. Think in data and statistics, and \
                ask clarifying questions when the request is underspecified."
                .to_string(),
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 2_048,
            history_window: None,
        },
        Persona {
            key: "storyteller".to_string(),
            name: "Creative Storyteller".to_string(),
            system_prompt: "You are a creative storyteller and author. Write emotionally \
                engaging stories with varied vocabulary and poetic language. Be bold with \
                unusual ideas, build tension, and create distinctive characters and worlds."
                .to_string(),
            temperature: 0.9,
            top_p: 0.95,
            top_k: 100,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 2_048,
            history_window: None,
        },
        Persona {
            key: "coder".to_string(),
            name: "Technical Code Assistant".to_string(),
            system_prompt: "You are a senior software engineer. Write precise, production-ready \
                code. Explain the logic in detail, point out best practices and optimizations, \
                warn about common pitfalls, and use exact syntax and standards."
                .to_string(),
            temperature: 0.2,
            top_p: 0.7,
            top_k: 30,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 2_048,
            history_window: None,
        },
        Persona {
            key: "consultant".to_string(),
            name: "Business Consultant".to_string(),
            system_prompt: "You are a business consultant focused on strategy. Give strategic \
                advice balanced between creativity and practical execution. Think in ROI, KPIs, \
                and business metrics, ask about the business situation, and give concrete \
                recommendations."
                .to_string(),
            temperature: 0.4,
            top_p: 0.85,
            top_k: 50,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 2_048,
            history_window: None,
        },
    ]
}
