use common::{error::AppError, storage::chunk_store::ChunkStore};
use tracing::{debug, instrument};

/// How much of each query's result set feeds the context block.
///
/// Generation wants every hit per topic; evaluation wants only the single
/// closest chunk per question. Same search, different caller policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    AllHits,
    TopHit,
}

/// Runs one similarity search per query and concatenates the retrieved
/// contents into a single newline-joined block, preserving query order.
/// Queries with no hits contribute nothing; they are not an error.
#[instrument(skip_all, fields(queries = queries.len(), k, ?mode))]
pub async fn assemble_context(
    store: &ChunkStore,
    queries: &[String],
    k: usize,
    mode: ContextMode,
) -> Result<String, AppError> {
    let mut context = String::new();

    for query in queries {
        let hits = store.similarity_search(query, k).await?;
        if hits.is_empty() {
            debug!(query, "Query returned no supporting chunks");
            continue;
        }

        match mode {
            ContextMode::AllHits => {
                for hit in &hits {
                    context.push_str(&hit.content);
                    context.push('\n');
                }
            }
            ContextMode::TopHit => {
                if let Some(top) = hits.first() {
                    context.push_str(&top.content);
                    context.push('\n');
                }
            }
        }
    }

    Ok(context)
}
