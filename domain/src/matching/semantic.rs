//! Semantic scorer: cosine similarity over embeddings
//!
//! Registry identifiers carry embeddings computed once at registry
//! construction. The invoked identifier's embedding comes from the per-call
//! [`QueryEmbeddings`], filled by the application layer through the embedder
//! port before the synchronous pipeline runs, and dropped when the call ends.

use super::Score;
use crate::core::error::DomainError;
use crate::tool::registry::ToolRegistry;
use std::collections::HashMap;

/// A single embedding vector.
pub type Embedding = Vec<f32>;

/// Cosine similarity clamped to `[0.0, 1.0]`
///
/// Negative similarity carries no evidence of a match and floors to 0.
/// Mismatched lengths, empty vectors and zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Score {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Embeddings of invoked identifiers, scoped to one alignment call
#[derive(Debug, Clone, Default)]
pub struct QueryEmbeddings {
    vectors: HashMap<String, Embedding>,
}

impl QueryEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: impl Into<String>, embedding: Embedding) {
        self.vectors.insert(text.into(), embedding);
    }

    pub fn with(mut self, text: impl Into<String>, embedding: Embedding) -> Self {
        self.insert(text, embedding);
        self
    }

    pub fn get(&self, text: &str) -> Option<&[f32]> {
        self.vectors.get(text).map(|v| v.as_slice())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.vectors.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl FromIterator<(String, Embedding)> for QueryEmbeddings {
    fn from_iter<T: IntoIterator<Item = (String, Embedding)>>(iter: T) -> Self {
        Self {
            vectors: iter.into_iter().collect(),
        }
    }
}

/// Scores invoked identifiers against registry identifiers
#[derive(Debug, Clone, Copy)]
pub struct SemanticScorer<'a> {
    registry: &'a ToolRegistry,
    query: &'a QueryEmbeddings,
}

impl<'a> SemanticScorer<'a> {
    pub fn new(registry: &'a ToolRegistry, query: &'a QueryEmbeddings) -> Self {
        Self { registry, query }
    }

    /// Resolve the embedding of one invoked identifier
    ///
    /// Looks in the per-call embeddings first, then in the registry cache
    /// (an invoked string that is itself a registry identifier embeds to the
    /// same vector).
    pub fn for_invoked(&self, invoked: &str) -> Result<InvokedScorer<'a>, DomainError> {
        let query = self
            .query
            .get(invoked)
            .or_else(|| self.registry.embedding(invoked))
            .ok_or_else(|| {
                DomainError::EmbeddingUnavailable(format!(
                    "no embedding computed for '{}'",
                    crate::core::string::truncate(invoked, 64)
                ))
            })?;

        if let Some(expected) = self.registry.dimensions()
            && query.len() != expected
        {
            return Err(DomainError::EmbeddingUnavailable(format!(
                "embedding has {} dimensions, registry expects {}",
                query.len(),
                expected
            )));
        }

        Ok(InvokedScorer {
            query,
            registry: self.registry,
        })
    }
}

/// The embedding of one invoked identifier, ready to score candidates
#[derive(Debug, Clone, Copy)]
pub struct InvokedScorer<'a> {
    query: &'a [f32],
    registry: &'a ToolRegistry,
}

impl InvokedScorer<'_> {
    /// Cosine similarity between the invoked identifier and a registry identifier
    pub fn score(&self, identifier: &str) -> Result<Score, DomainError> {
        let cached = self
            .registry
            .embedding(identifier)
            .ok_or_else(|| DomainError::MissingEmbedding(identifier.to_string()))?;
        Ok(cosine_similarity(self.query, cached))
    }
}
