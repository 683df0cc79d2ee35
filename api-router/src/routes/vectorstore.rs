use std::{collections::HashMap, path::PathBuf};

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct VectorizePdfRequest {
    pub pdf_path: PathBuf,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

pub async fn vectorize_pdf(
    State(state): State<ApiState>,
    Json(input): Json<VectorizePdfRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(path = %input.pdf_path.display(), "Received vectorization request");

    let topics = state
        .ingestion_pipeline
        .ingest_pdf(&input.pdf_path, input.metadata)
        .await?;

    Ok(Json(json!({
        "message": "PDF vectorized successfully",
        "importantTopics": topics,
    })))
}

pub async fn get_chunk(
    State(state): State<ApiState>,
    Path(chunk_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let chunk = state
        .chunk_store
        .get_by_id(&chunk_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chunk not found".to_string()))?;

    Ok(Json(json!({
        "content": chunk.content,
        "metadata": chunk.metadata,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteChunksRequest {
    pub chunk_ids: Vec<String>,
}

pub async fn delete_chunks(
    State(state): State<ApiState>,
    Json(input): Json<DeleteChunksRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.chunk_store.delete_by_ids(&input.chunk_ids).await?;

    info!(count = input.chunk_ids.len(), "Deleted chunks");

    Ok(Json(json!({ "message": "Chunks deleted successfully" })))
}

pub async fn delete_all_chunks(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.chunk_store.delete_all().await?;

    let message = if deleted {
        "All chunks deleted successfully"
    } else {
        "No chunks found to delete"
    };

    Ok(Json(json!({ "message": message })))
}

pub async fn get_chunks(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let chunks = state.chunk_store.list_all().await?;

    let listing: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            json!({
                "id": chunk.id,
                "content": chunk.content,
                "metadata": chunk.metadata,
            })
        })
        .collect();

    Ok(Json(json!({ "chunks": listing })))
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct SearchChunksRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

pub async fn search_chunks(
    State(state): State<ApiState>,
    Json(input): Json<SearchChunksRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let hits = state
        .chunk_store
        .similarity_search(&input.query, input.top_k)
        .await?;

    let results: Vec<String> = hits.into_iter().map(|chunk| chunk.content).collect();

    Ok(Json(json!({ "results": results })))
}
