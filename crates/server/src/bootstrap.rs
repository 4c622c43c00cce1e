use std::sync::Arc;

use shopwise_agent::{OpenAiCompatibleClient, ProviderError, ShoppingAssistant};
use shopwise_core::config::{AppConfig, ConfigError};
use shopwise_db::{
    connect_with_settings, migrations, CatalogSeed, ChatSessionRepository, DbPool,
    RepositoryError, SqlCatalogStore, SqlChatSessionRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub assistant: Arc<ShoppingAssistant>,
    pub sessions: Arc<dyn ChatSessionRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
    #[error("completion client setup failed: {0}")]
    Provider(#[source] ProviderError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let seeded = CatalogSeed::load(&db_pool).await.map_err(BootstrapError::Seed)?;
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        inserted = seeded.inserted,
        existing = seeded.skipped_existing,
        "product catalog ready"
    );

    let client = OpenAiCompatibleClient::from_config(&config.llm).map_err(BootstrapError::Provider)?;
    info!(
        event_name = "system.bootstrap.llm_client_ready",
        correlation_id = "bootstrap",
        provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        "completion client configured"
    );

    let assistant = Arc::new(ShoppingAssistant::from_config(
        Arc::new(SqlCatalogStore::new(db_pool.clone())),
        Arc::new(client),
        &config,
    ));
    let sessions: Arc<dyn ChatSessionRepository> =
        Arc::new(SqlChatSessionRepository::new(db_pool.clone()));

    Ok(Application { config, db_pool, assistant, sessions })
}
