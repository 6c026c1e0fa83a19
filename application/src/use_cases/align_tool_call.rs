//! Align Tool Call use case
//!
//! Computes the per-call query embeddings through the [`EmbedderPort`], then
//! runs the synchronous domain [`AlignmentPipeline`].
//!
//! ```text
//! RawToolCall ─▶ query_identifiers ─▶ embed (concurrent) ─▶ pipeline.align ─▶ AlignmentOutcome
//! ```
//!
//! The query embeddings live only for the duration of one `execute` call.

use crate::config::AlignmentConfig;
use crate::ports::embedder::{EmbedderPort, EmbeddingError};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use toolalign_domain::{
    AlignmentOutcome, AlignmentPipeline, DomainError, QueryEmbeddings, RawToolCall, ToolRegistry,
};
use tracing::{debug, info, warn};

/// Errors that can occur while aligning a tool call
///
/// Malformed calls are not errors; they come back as
/// [`AlignmentOutcome::Rejected`].
#[derive(Error, Debug)]
pub enum AlignToolCallError {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AlignToolCallError {
    /// Stable code surfaced to callers
    pub fn code(&self) -> &str {
        match self {
            AlignToolCallError::EmbeddingUnavailable(_) => "embedding_unavailable",
            AlignToolCallError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub fn is_embedding_unavailable(&self) -> bool {
        matches!(self, AlignToolCallError::EmbeddingUnavailable(_))
    }
}

impl From<EmbeddingError> for AlignToolCallError {
    fn from(error: EmbeddingError) -> Self {
        AlignToolCallError::EmbeddingUnavailable(error.to_string())
    }
}

impl From<DomainError> for AlignToolCallError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::EmbeddingUnavailable(msg) => AlignToolCallError::EmbeddingUnavailable(msg),
            DomainError::InvalidThreshold { .. } => AlignToolCallError::InvalidConfig(error.to_string()),
            other => AlignToolCallError::EmbeddingUnavailable(other.to_string()),
        }
    }
}

/// Use case for aligning raw tool calls against one registry
///
/// Holds no per-call state; share it behind an `Arc` and call
/// [`execute`](Self::execute) from as many tasks as needed.
pub struct AlignToolCallUseCase {
    pipeline: AlignmentPipeline,
    embedder: Option<Arc<dyn EmbedderPort>>,
}

impl AlignToolCallUseCase {
    /// Create a lexical-only use case
    ///
    /// Semantic scoring needs an embedder; attach one with
    /// [`with_embedder`](Self::with_embedder).
    pub fn new(
        registry: Arc<ToolRegistry>,
        config: AlignmentConfig,
    ) -> Result<Self, AlignToolCallError> {
        let policy = config.to_policy()?;
        if policy.semantic_enabled {
            debug!("No embedder attached yet; semantic scoring stays off until one is");
        }
        Ok(Self {
            pipeline: AlignmentPipeline::new(registry, policy.lexical_only()),
            embedder: None,
        })
    }

    /// Create a use case that scores both channels
    pub fn with_embedder(
        registry: Arc<ToolRegistry>,
        config: AlignmentConfig,
        embedder: Arc<dyn EmbedderPort>,
    ) -> Result<Self, AlignToolCallError> {
        let policy = config.to_policy()?;
        if policy.semantic_enabled && !registry.has_embeddings() && !registry.is_empty() {
            warn!(
                "Registry has no cached embeddings; semantic scoring will report embedding_unavailable"
            );
        }
        Ok(Self {
            pipeline: AlignmentPipeline::new(registry, policy),
            embedder: Some(embedder),
        })
    }

    pub fn pipeline(&self) -> &AlignmentPipeline {
        &self.pipeline
    }

    pub fn semantic_enabled(&self) -> bool {
        self.embedder.is_some() && self.pipeline.policy().semantic_enabled
    }

    /// Align one raw call using every configured channel
    pub async fn execute(&self, call: &RawToolCall) -> Result<AlignmentOutcome, AlignToolCallError> {
        let query = match (&self.embedder, self.pipeline.policy().semantic_enabled) {
            (Some(embedder), true) => self.embed_query(embedder.as_ref(), call).await?,
            _ => QueryEmbeddings::new(),
        };

        let outcome = self.pipeline.align(call, &query)?;
        log_outcome(call, &outcome);
        Ok(outcome)
    }

    /// Align one raw call with the lexical channel only
    ///
    /// Needs no embeddings, so it cannot fail on the embedding channel.
    pub fn align_lexical_only(&self, call: &RawToolCall) -> Result<AlignmentOutcome, AlignToolCallError> {
        let outcome = self
            .pipeline
            .lexical_only()
            .align(call, &QueryEmbeddings::new())?;
        log_outcome(call, &outcome);
        Ok(outcome)
    }

    /// Align with both channels, degrading to lexical-only when embeddings fail
    pub async fn execute_with_fallback(
        &self,
        call: &RawToolCall,
    ) -> Result<AlignmentOutcome, AlignToolCallError> {
        match self.execute(call).await {
            Err(e) if e.is_embedding_unavailable() => {
                warn!("Falling back to lexical-only alignment: {}", e);
                self.align_lexical_only(call)
            }
            other => other,
        }
    }

    /// Embed every distinct invoked identifier the pipeline will ask for
    async fn embed_query(
        &self,
        embedder: &dyn EmbedderPort,
        call: &RawToolCall,
    ) -> Result<QueryEmbeddings, AlignToolCallError> {
        let identifiers = self.pipeline.query_identifiers(call);
        if identifiers.is_empty() {
            return Ok(QueryEmbeddings::new());
        }

        debug!(
            "Embedding {} identifier(s) with {}",
            identifiers.len(),
            embedder.name()
        );

        let embeddings = try_join_all(identifiers.into_iter().map(|text| async move {
            let embedding = embedder.embed_checked(&text).await?;
            Ok::<_, EmbeddingError>((text, embedding))
        }))
        .await?;

        Ok(embeddings.into_iter().collect())
    }
}

fn log_outcome(call: &RawToolCall, outcome: &AlignmentOutcome) {
    match outcome {
        AlignmentOutcome::Aligned(aligned) => {
            if aligned.is_exact() {
                debug!("Tool call '{}' matched exactly", aligned.tool_name);
            } else {
                info!(
                    "Aligned tool call '{}' -> '{}' ({} correction(s))",
                    toolalign_domain::core::string::truncate(&call.name, 64),
                    aligned.tool_name,
                    aligned.diagnostics.len()
                );
            }
        }
        AlignmentOutcome::Rejected(rejection) => {
            info!(
                "Rejected tool call '{}' at {}: {}",
                toolalign_domain::core::string::truncate(&call.name, 64),
                rejection.stage,
                rejection.reason
            );
        }
    }
}
