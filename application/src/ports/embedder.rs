//! Embedder port
//!
//! Defines the interface for turning identifier text into embedding vectors.

use async_trait::async_trait;
use thiserror::Error;
use toolalign_domain::Embedding;

/// Errors that can occur while computing an embedding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("Embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Deterministic text embedder
///
/// Identical input must produce an identical vector, and every vector from
/// one embedder has [`dimensions`](Self::dimensions) elements. Implementations
/// (adapters) live in the infrastructure layer; retry and timeout policy is
/// theirs, not the alignment engine's.
#[async_trait]
pub trait EmbedderPort: Send + Sync {
    /// Embed one piece of text
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Dimensionality of every vector this embedder returns
    fn dimensions(&self) -> usize;

    /// Short name for logs
    fn name(&self) -> &str {
        "embedder"
    }

    /// Embed and check the dimensionality contract
    async fn embed_checked(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let embedding = self.embed(text).await?;
        if embedding.len() != self.dimensions() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions(),
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}
