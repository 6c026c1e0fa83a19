//! Embedding adapters implementing [`EmbedderPort`]

mod hashing;

pub use hashing::HashingEmbedder;

use crate::config::{ConfigValidationError, EmbeddingProvider, FileEmbeddingConfig};
use std::sync::Arc;
use toolalign_application::EmbedderPort;

/// Construct the embedder named by the `[embedding]` section
///
/// `Ok(None)` means the provider is `"none"` and alignment runs lexical-only.
pub fn embedder_from_config(
    config: &FileEmbeddingConfig,
) -> Result<Option<Arc<dyn EmbedderPort>>, ConfigValidationError> {
    match config.provider()? {
        EmbeddingProvider::Hashing => Ok(Some(Arc::new(HashingEmbedder::new(
            config.dimensions,
            config.ngram,
        )))),
        EmbeddingProvider::None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_from_config() {
        let config = FileEmbeddingConfig {
            provider: "hashing".to_string(),
            dimensions: 64,
            ngram: 2,
        };
        let embedder = embedder_from_config(&config).unwrap().unwrap();
        assert_eq!(embedder.dimensions(), 64);
        assert_eq!(embedder.name(), "hashing");

        let config = FileEmbeddingConfig {
            provider: "none".to_string(),
            ..FileEmbeddingConfig::default()
        };
        assert!(embedder_from_config(&config).unwrap().is_none());

        let config = FileEmbeddingConfig {
            provider: "word2vec".to_string(),
            ..FileEmbeddingConfig::default()
        };
        assert!(embedder_from_config(&config).is_err());
    }
}
