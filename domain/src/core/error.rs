//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Malformed model output is never an error here: it becomes a
/// [`Rejection`](crate::alignment::outcome::Rejection). These variants cover
/// registry construction faults and a failing embedding collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Duplicate tool name in registry: {0}")]
    DuplicateTool(String),

    #[error("Duplicate parameter '{parameter}' in tool '{tool}'")]
    DuplicateParameter { tool: String, parameter: String },

    #[error("Invalid tool schema: {0}")]
    InvalidSchema(String),

    #[error("Embedding for '{identifier}' has {actual} dimensions, expected {expected}")]
    EmbeddingDimensionMismatch {
        identifier: String,
        expected: usize,
        actual: usize,
    },

    #[error("Missing registry embedding for identifier: {0}")]
    MissingEmbedding(String),

    #[error("Invalid threshold {name} = {value} (must be within 0.0..=1.0)")]
    InvalidThreshold { name: String, value: f64 },

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),
}

impl DomainError {
    /// Check if this error comes from the embedding channel
    ///
    /// Callers use this to decide between retrying the embedding call and
    /// falling back to lexical-only alignment.
    pub fn is_embedding_unavailable(&self) -> bool {
        matches!(self, DomainError::EmbeddingUnavailable(_))
    }
}
