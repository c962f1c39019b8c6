//! Application state wiring all services together.
//!
//! The orchestrator is generic over provider/store traits; AppState pins it
//! to the concrete infra implementations used by both the CLI and the REST
//! API.

use std::sync::Arc;

use personachat_core::catalog::PersonaCatalog;
use personachat_core::orchestrator::ChatOrchestrator;
use personachat_core::retry::RetryPolicy;
use personachat_infra::config::{database_url, load_app_config, load_personas, resolve_data_dir};
use personachat_infra::gemini::GeminiProvider;
use personachat_infra::secret::{GEMINI_API_KEY_VAR, load_api_key};
use personachat_infra::sqlite::conversation::SqliteConversationStore;
use personachat_infra::sqlite::pool::DatabasePool;
use personachat_types::config::AppConfig;

/// Concrete orchestrator type pinned to the infra implementations.
pub type ConcreteOrchestrator = ChatOrchestrator<GeminiProvider, SqliteConversationStore>;

/// Shared application state used by CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: AppConfig,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, build the persona catalog, wire the orchestrator.
    ///
    /// Fails fast on a missing API key or any invalid persona definition.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = SqliteConversationStore::new(db_pool);

        let personas = load_personas(&config).await?;
        let catalog = Arc::new(PersonaCatalog::new(personas)?);

        let api_key = load_api_key(GEMINI_API_KEY_VAR).ok_or_else(|| {
            anyhow::anyhow!("{GEMINI_API_KEY_VAR} is not set; export your Gemini API key first")
        })?;

        let mut provider = GeminiProvider::new(api_key);
        if let Some(base_url) = &config.provider.base_url {
            provider = provider.with_base_url(base_url.clone());
        }

        let orchestrator = ChatOrchestrator::new(
            catalog,
            provider,
            store,
            RetryPolicy::from_config(&config.provider),
            config.history_window,
        );

        tracing::info!(
            data_dir = %data_dir.display(),
            personas = orchestrator.catalog().len(),
            "Application state initialized"
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            config,
        })
    }
}
