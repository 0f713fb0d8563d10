use std::sync::Arc;

use petworld_agent::{LlmClient, LlmError, OpenAiCompatibleClient, RefinementEngine};
use petworld_core::config::AppConfig;
use petworld_db::repositories::{RepositoryError, SqlConversationRepository, SqlProductRepository};
use petworld_db::{connect_with_settings, migrations, CatalogSeed, DbPool};
use tera::Tera;
use thiserror::Error;
use tracing::info;

use crate::chat::ChatService;
use crate::web;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub chat: Arc<ChatService>,
    pub templates: Arc<Tera>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
    #[error("llm client setup failed: {0}")]
    Llm(#[source] LlmError),
    #[error("template setup failed: {0}")]
    Templates(#[source] tera::Error),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let llm = OpenAiCompatibleClient::from_config(&config.llm).map_err(BootstrapError::Llm)?;
    bootstrap_with_llm(config, Arc::new(llm)).await
}

/// Wire the application around an already-built generation client.
pub async fn bootstrap_with_llm(
    config: AppConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<Application, BootstrapError> {
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

    let seed = CatalogSeed::load(&db_pool).await.map_err(BootstrapError::Seed)?;
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        products_inserted = seed.products_inserted,
        already_seeded = seed.already_seeded,
        "product catalog ready"
    );

    let engine =
        RefinementEngine::new(llm).with_max_iterations(config.refinement.max_iterations);
    let chat = ChatService::new(
        Arc::new(SqlProductRepository::new(db_pool.clone())),
        Arc::new(SqlConversationRepository::new(db_pool.clone())),
        Arc::new(engine),
    );
    let templates = web::init_templates().map_err(BootstrapError::Templates)?;

    Ok(Application { config, db_pool, chat: Arc::new(chat), templates: Arc::new(templates) })
}
