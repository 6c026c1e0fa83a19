//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! after validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use toolalign_application::AlignmentConfig;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("alignment.{name} must be within 0.0..=1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("embedding.dimensions cannot be 0")]
    ZeroDimensions,

    #[error("embedding.ngram cannot be 0")]
    ZeroNgram,

    #[error("embedding.provider '{0}' is not supported (expected \"hashing\" or \"none\")")]
    UnknownProvider(String),
}

/// Raw alignment configuration from TOML
///
/// Same knobs as [`AlignmentConfig`]; kept separate so the file format can
/// evolve without touching the application crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAlignmentConfig {
    pub tool_name_lexical_threshold: f64,
    pub tool_name_semantic_threshold: f64,
    pub tool_args_lexical_threshold: f64,
    pub tool_args_semantic_threshold: f64,
    pub semantic_enabled: bool,
}

impl Default for FileAlignmentConfig {
    fn default() -> Self {
        let defaults = AlignmentConfig::default();
        Self {
            tool_name_lexical_threshold: defaults.tool_name_lexical_threshold,
            tool_name_semantic_threshold: defaults.tool_name_semantic_threshold,
            tool_args_lexical_threshold: defaults.tool_args_lexical_threshold,
            tool_args_semantic_threshold: defaults.tool_args_semantic_threshold,
            semantic_enabled: defaults.semantic_enabled,
        }
    }
}

/// Which embedding backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Local feature-hashing embedder
    Hashing,
    /// No embedder; alignment runs lexical-only
    None,
}

/// Raw embedding configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    /// `"hashing"` or `"none"`
    pub provider: String,
    /// Vector length
    pub dimensions: usize,
    /// Character n-gram size
    pub ngram: usize,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            dimensions: 256,
            ngram: 3,
        }
    }
}

impl FileEmbeddingConfig {
    pub fn provider(&self) -> Result<EmbeddingProvider, ConfigValidationError> {
        match self.provider.trim().to_lowercase().as_str() {
            "hashing" => Ok(EmbeddingProvider::Hashing),
            "none" | "" => Ok(EmbeddingProvider::None),
            other => Err(ConfigValidationError::UnknownProvider(other.to_string())),
        }
    }
}

/// Raw registry configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// Path to a TOML or JSON tool registry
    pub path: Option<PathBuf>,
}

/// Complete TOML configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub alignment: FileAlignmentConfig,
    pub embedding: FileEmbeddingConfig,
    pub registry: FileRegistryConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let a = &self.alignment;
        for (name, value) in [
            ("tool_name_lexical_threshold", a.tool_name_lexical_threshold),
            ("tool_name_semantic_threshold", a.tool_name_semantic_threshold),
            ("tool_args_lexical_threshold", a.tool_args_lexical_threshold),
            ("tool_args_semantic_threshold", a.tool_args_semantic_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::ThresholdOutOfRange { name, value });
            }
        }

        if self.embedding.dimensions == 0 {
            return Err(ConfigValidationError::ZeroDimensions);
        }
        if self.embedding.ngram == 0 {
            return Err(ConfigValidationError::ZeroNgram);
        }
        self.embedding.provider()?;

        Ok(())
    }

    /// Convert the `[alignment]` section into the application config
    ///
    /// Semantic scoring is forced off when no embedding provider is configured.
    pub fn to_alignment_config(&self) -> AlignmentConfig {
        let a = &self.alignment;
        let semantic_enabled = a.semantic_enabled
            && matches!(self.embedding.provider(), Ok(EmbeddingProvider::Hashing));

        AlignmentConfig {
            tool_name_lexical_threshold: a.tool_name_lexical_threshold,
            tool_name_semantic_threshold: a.tool_name_semantic_threshold,
            tool_args_lexical_threshold: a.tool_args_lexical_threshold,
            tool_args_semantic_threshold: a.tool_args_semantic_threshold,
            semantic_enabled,
        }
    }
}
