//! Global configuration types for personachat.
//!
//! `AppConfig` represents the top-level `config.toml` controlling the HTTP
//! server, provider behavior, and the context-window default.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `{data_dir}/config.toml`.
///
/// All fields have sensible defaults so a missing file yields a working
/// local setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    /// Default number of recent user/assistant turns sent to the provider
    /// alongside the system turn. Personas may override per-key.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Optional path to a personas.toml file. When absent, the built-in
    /// catalog is used.
    #[serde(default)]
    pub personas_file: Option<String>,
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Generation provider tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Per-call timeout in milliseconds. A timeout is classified as a
    /// transient failure and participates in the retry budget.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Additional attempts after the first failed call (transient errors
    /// only).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds; doubles per retry.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Override the provider base URL (testing, proxies).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_history_window() -> usize {
    20
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            history_window: default_history_window(),
            personas_file: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            base_url: None,
        }
    }
}
