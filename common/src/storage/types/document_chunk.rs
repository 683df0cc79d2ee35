use std::collections::HashMap;

use crate::stored_object;
use uuid::Uuid;

stored_object!(DocumentChunk, "document_chunk", {
    /// Immutable text span produced by the splitter
    content: String,
    /// Caller-supplied key/value mapping, merged into every chunk of a source document
    metadata: HashMap<String, String>,
    /// Embedding vector, dimension fixed by the configured provider
    embedding: Vec<f32>
});

impl DocumentChunk {
    pub fn new(content: String, metadata: HashMap<String, String>, embedding: Vec<f32>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            content,
            metadata,
            embedding,
        }
    }
}
