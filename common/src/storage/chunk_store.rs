use std::{collections::HashMap, sync::Arc};

use surrealdb::sql::Thing;
use tracing::debug;

use crate::{error::AppError, utils::embedding::EmbeddingProvider};

use super::{
    db::SurrealDbClient,
    types::{document_chunk::DocumentChunk, StoredObject},
};

/// A chunk that has not been indexed yet: content plus the merged caller
/// metadata, before an id or embedding exists.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub content: String,
    pub metadata: HashMap<String, String>,
}

/// Adapter over the persistent vector index.
///
/// All mutating operations are acknowledged by SurrealDB before returning,
/// so a successful return is a durability guarantee. Callers get
/// all-or-nothing semantics per operation; partial success is never
/// reported.
#[derive(Clone)]
pub struct ChunkStore {
    db: Arc<SurrealDbClient>,
    embedder: Arc<EmbeddingProvider>,
}

impl ChunkStore {
    pub fn new(db: Arc<SurrealDbClient>, embedder: Arc<EmbeddingProvider>) -> Self {
        Self { db, embedder }
    }

    /// Embeds and persists a batch of chunks, returning the assigned ids in
    /// input order. The whole batch goes through one INSERT statement, so a
    /// failed add never leaves part of the batch behind.
    pub async fn add_chunks(&self, chunks: Vec<NewChunk>) -> Result<Vec<String>, AppError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let contents: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(contents).await?;

        let records: Vec<DocumentChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                DocumentChunk::new(chunk.content, chunk.metadata, embedding)
            })
            .collect();
        let ids: Vec<String> = records.iter().map(|record| record.id.clone()).collect();

        let insert = format!("INSERT INTO {} $chunks", DocumentChunk::table_name());
        let response = self.db.query(insert).bind(("chunks", records)).await?;
        response.check()?;

        debug!(count = ids.len(), "Persisted chunk batch");

        Ok(ids)
    }

    /// Absent ids resolve to `None`, never an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<DocumentChunk>, AppError> {
        Ok(self.db.get_item::<DocumentChunk>(id).await?)
    }

    /// Deletes the given chunks in one DELETE statement; ids absent from the
    /// index are skipped. All-or-nothing like `add_chunks`.
    pub async fn delete_by_ids(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let records: Vec<Thing> = ids
            .iter()
            .map(|id| Thing::from((DocumentChunk::table_name(), id.as_str())))
            .collect();

        let response = self.db.query("DELETE $chunks").bind(("chunks", records)).await?;
        response.check()?;

        Ok(())
    }

    /// Deletes every chunk. Returns whether anything was actually removed.
    pub async fn delete_all(&self) -> Result<bool, AppError> {
        let deleted: Vec<DocumentChunk> = self.db.drop_table().await?;

        Ok(!deleted.is_empty())
    }

    pub async fn list_all(&self) -> Result<Vec<DocumentChunk>, AppError> {
        Ok(self.db.get_all_stored_items::<DocumentChunk>().await?)
    }

    /// KNN search over the HNSW index, most similar first. Returns at most
    /// `k` chunks; fewer when the index holds fewer.
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<DocumentChunk>, AppError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let closest_query = format!(
            "SELECT *, vector::distance::knn() AS distance FROM {} WHERE embedding <|{},40|> {:?} ORDER BY distance",
            DocumentChunk::table_name(),
            k,
            query_embedding
        );

        let closest_chunks: Vec<DocumentChunk> =
            self.db.query(closest_query).await?.take(0)?;

        Ok(closest_chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const TEST_DIMENSION: usize = 16;

    async fn test_store() -> ChunkStore {
        let namespace = "test_ns";
        let database = &Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory(namespace, database)
            .await
            .expect("Failed to start in-memory surrealdb");

        db.ensure_chunk_index(TEST_DIMENSION)
            .await
            .expect("Failed to define chunk index");

        let embedder = EmbeddingProvider::new_hashed(TEST_DIMENSION);
        ChunkStore::new(Arc::new(db), Arc::new(embedder))
    }

    fn bio_chunk(content: &str) -> NewChunk {
        NewChunk {
            content: content.to_string(),
            metadata: HashMap::from([("subject".to_string(), "bio".to_string())]),
        }
    }

    #[tokio::test]
    async fn test_add_and_get_round_trip() {
        let store = test_store().await;

        let ids = store
            .add_chunks(vec![bio_chunk("Mitochondria produce ATP.")])
            .await
            .expect("Failed to add chunks");
        assert_eq!(ids.len(), 1);

        let fetched = store
            .get_by_id(&ids[0])
            .await
            .expect("Failed to fetch chunk")
            .expect("Chunk should exist");

        assert_eq!(fetched.content, "Mitochondria produce ATP.");
        assert_eq!(fetched.metadata.get("subject"), Some(&"bio".to_string()));
        assert_eq!(fetched.embedding.len(), TEST_DIMENSION);
    }

    #[tokio::test]
    async fn test_get_by_nonexistent_id_returns_none() {
        let store = test_store().await;

        let fetched = store
            .get_by_id("nonexistent")
            .await
            .expect("Lookup should not error");

        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_ids_removes_only_requested() {
        let store = test_store().await;

        let ids = store
            .add_chunks(vec![bio_chunk("first"), bio_chunk("second")])
            .await
            .expect("Failed to add chunks");

        store
            .delete_by_ids(&ids[..1])
            .await
            .expect("Failed to delete chunk");

        assert!(store.get_by_id(&ids[0]).await.unwrap().is_none());
        assert!(store.get_by_id(&ids[1]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_chunks_persists_whole_batch_with_ids_in_input_order() {
        let store = test_store().await;

        let contents = ["first", "second", "third"];
        let ids = store
            .add_chunks(contents.iter().map(|c| bio_chunk(c)).collect())
            .await
            .expect("Failed to add chunks");
        assert_eq!(ids.len(), contents.len());

        // Every assigned id resolves, and in the same order as the input
        for (id, content) in ids.iter().zip(contents) {
            let chunk = store
                .get_by_id(id)
                .await
                .expect("Lookup failed")
                .expect("Chunk should exist");
            assert_eq!(chunk.content, content);
        }
    }

    #[tokio::test]
    async fn test_delete_by_ids_skips_missing_ids() {
        let store = test_store().await;

        let mut ids = store
            .add_chunks(vec![bio_chunk("kept nowhere")])
            .await
            .expect("Failed to add chunks");
        ids.push("never-existed".to_string());

        store
            .delete_by_ids(&ids)
            .await
            .expect("Missing ids must not fail the batch");

        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_ids_with_empty_list_is_a_no_op() {
        let store = test_store().await;

        store
            .add_chunks(vec![bio_chunk("untouched")])
            .await
            .expect("Failed to add chunks");

        store
            .delete_by_ids(&[])
            .await
            .expect("Empty batch must not fail");

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_reports_whether_chunks_existed() {
        let store = test_store().await;

        store
            .add_chunks(vec![bio_chunk("only chunk")])
            .await
            .expect("Failed to add chunks");

        assert!(store.delete_all().await.expect("Failed to delete all"));
        assert!(store.list_all().await.unwrap().is_empty());

        // Second pass has nothing left to delete
        assert!(!store.delete_all().await.expect("Failed to delete all"));
    }

    #[tokio::test]
    async fn test_similarity_search_orders_by_distance() {
        let store = test_store().await;

        store
            .add_chunks(vec![
                bio_chunk("glycolysis splits glucose into pyruvate"),
                bio_chunk("the treaty of westphalia ended the thirty years war"),
            ])
            .await
            .expect("Failed to add chunks");

        let results = store
            .similarity_search("glycolysis splits glucose into pyruvate", 2)
            .await
            .expect("Search failed");

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].content,
            "glycolysis splits glucose into pyruvate"
        );
    }

    #[tokio::test]
    async fn test_similarity_search_with_zero_k() {
        let store = test_store().await;

        let results = store
            .similarity_search("anything", 0)
            .await
            .expect("Search failed");

        assert!(results.is_empty());
    }
}
