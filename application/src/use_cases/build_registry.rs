//! Build Registry use case
//!
//! Validates tool schemas and, when an embedder is attached, embeds every
//! registry identifier exactly once before freezing the [`ToolRegistry`].

use crate::ports::embedder::{EmbedderPort, EmbeddingError};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use toolalign_domain::{DomainError, ToolRegistry, ToolSchema};
use tracing::{debug, info};

/// Errors that can occur during registry construction
#[derive(Error, Debug)]
pub enum BuildRegistryError {
    #[error("Invalid registry: {0}")]
    Invalid(#[from] DomainError),

    #[error("Failed to embed identifier '{identifier}': {source}")]
    Embedding {
        identifier: String,
        #[source]
        source: EmbeddingError,
    },
}

/// Use case for constructing an immutable registry
pub struct BuildRegistryUseCase {
    embedder: Option<Arc<dyn EmbedderPort>>,
}

impl BuildRegistryUseCase {
    /// Registry without embeddings (lexical-only alignment)
    pub fn new() -> Self {
        Self { embedder: None }
    }

    pub fn with_embedder(embedder: Arc<dyn EmbedderPort>) -> Self {
        Self {
            embedder: Some(embedder),
        }
    }

    pub async fn execute(&self, tools: Vec<ToolSchema>) -> Result<ToolRegistry, BuildRegistryError> {
        let builder = ToolRegistry::builder().register_all(tools);

        let Some(embedder) = &self.embedder else {
            let registry = builder.build()?;
            info!("Built registry with {} tool(s), no embeddings", registry.len());
            return Ok(registry);
        };

        let pending = builder.pending_identifiers();
        debug!(
            "Embedding {} registry identifier(s) with {}",
            pending.len(),
            embedder.name()
        );

        let embeddings = try_join_all(pending.into_iter().map(|identifier| {
            let embedder = Arc::clone(embedder);
            async move {
                match embedder.embed_checked(&identifier).await {
                    Ok(embedding) => Ok((identifier, embedding)),
                    Err(source) => Err(BuildRegistryError::Embedding { identifier, source }),
                }
            }
        }))
        .await?;

        let registry = builder.with_embeddings(embeddings).build()?;
        info!(
            "Built registry with {} tool(s), {}-dimensional embeddings",
            registry.len(),
            registry.dimensions().unwrap_or(0)
        );
        Ok(registry)
    }
}

impl Default for BuildRegistryUseCase {
    fn default() -> Self {
        Self::new()
    }
}
