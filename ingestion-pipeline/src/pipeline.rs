use std::{collections::HashMap, path::Path, sync::Arc};

use common::{
    error::AppError,
    storage::chunk_store::{ChunkStore, NewChunk},
    utils::config::AppConfig,
};
use text_splitter::{ChunkConfig, TextSplitter};
use tracing::{info, instrument};

use crate::utils::{pdf_text_extraction::extract_pdf_text, topic_extraction::find_important_topics};

/// Request-scoped document ingestion: extract, split, tag, summarize,
/// persist. Constructed once at startup with the shared handles.
pub struct IngestionPipeline {
    store: ChunkStore,
    openai_client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
    config: AppConfig,
}

impl IngestionPipeline {
    pub fn new(
        store: ChunkStore,
        openai_client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            openai_client,
            config,
        }
    }

    /// Ingests one PDF: the whole operation aborts on the first failing
    /// step, and the topic summary is returned on success.
    #[instrument(skip(self, metadata), fields(path = %pdf_path.display()))]
    pub async fn ingest_pdf(
        &self,
        pdf_path: &Path,
        metadata: HashMap<String, String>,
    ) -> Result<String, AppError> {
        let text = extract_pdf_text(pdf_path).await?;
        self.ingest_text(&text, metadata).await
    }

    /// The text-level ingestion seam: everything after PDF extraction.
    pub async fn ingest_text(
        &self,
        text: &str,
        metadata: HashMap<String, String>,
    ) -> Result<String, AppError> {
        let contents =
            split_into_chunks(text, self.config.chunk_size, self.config.chunk_overlap)?;

        let full_text = contents.join("\n\n");
        let topics = find_important_topics(
            &self.openai_client,
            &self.config.topic_model,
            &full_text,
        )
        .await?;

        let ids = self.persist_chunks(contents, &metadata).await?;
        info!(chunks = ids.len(), "Ingestion complete");

        Ok(topics)
    }

    /// Merges the caller metadata into every chunk and persists the batch.
    pub async fn persist_chunks(
        &self,
        contents: Vec<String>,
        metadata: &HashMap<String, String>,
    ) -> Result<Vec<String>, AppError> {
        let chunks = contents
            .into_iter()
            .map(|content| NewChunk {
                content,
                metadata: metadata.clone(),
            })
            .collect();

        self.store.add_chunks(chunks).await
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }
}

/// Splits extracted text into overlapping chunks, preserving source order.
pub fn split_into_chunks(
    text: &str,
    target_size: usize,
    overlap: usize,
) -> Result<Vec<String>, AppError> {
    if target_size == 0 {
        return Err(AppError::Validation("chunk size must be non-zero".into()));
    }

    let chunk_config = ChunkConfig::new(target_size)
        .with_overlap(overlap)
        .map_err(|e| AppError::Validation(format!("invalid chunk overlap: {e}")))?;
    let splitter = TextSplitter::new(chunk_config);

    Ok(splitter.chunks(text).map(str::to_owned).collect())
}
