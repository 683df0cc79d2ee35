use std::sync::Arc;

use common::{
    error::AppError,
    storage::{chunk_store::ChunkStore, db::SurrealDbClient},
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};
use ingestion_pipeline::pipeline::IngestionPipeline;

/// Shared handles for every route handler. Cheap to clone; all heavy
/// members sit behind an `Arc`.
#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SurrealDbClient>,
    pub chunk_store: ChunkStore,
    pub ingestion_pipeline: Arc<IngestionPipeline>,
    pub openai_client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
    pub config: AppConfig,
}

impl ApiState {
    /// Connects to the database, defines the vector index, and wires up the
    /// pipelines. Called once at startup.
    pub async fn new(config: &AppConfig) -> Result<Self, AppError> {
        let db = Arc::new(
            SurrealDbClient::new(
                &config.surrealdb_address,
                &config.surrealdb_username,
                &config.surrealdb_password,
                &config.surrealdb_namespace,
                &config.surrealdb_database,
            )
            .await?,
        );

        let openai_config = async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url);
        let openai_client = Arc::new(async_openai::Client::with_config(openai_config));

        let embedder = Arc::new(EmbeddingProvider::from_config(config, openai_client.clone()));
        db.ensure_chunk_index(embedder.dimension()).await?;

        let chunk_store = ChunkStore::new(db.clone(), embedder);
        let ingestion_pipeline = Arc::new(IngestionPipeline::new(
            chunk_store.clone(),
            openai_client.clone(),
            config.clone(),
        ));

        Ok(Self {
            db,
            chunk_store,
            ingestion_pipeline,
            openai_client,
            config: config.clone(),
        })
    }
}
