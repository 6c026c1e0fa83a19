//! Infrastructure layer for tool-align
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration and registry file loading.

pub mod config;
pub mod embedding;
pub mod registry;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, EmbeddingProvider, FileAlignmentConfig, FileConfig,
    FileEmbeddingConfig, FileRegistryConfig,
};
pub use embedding::{HashingEmbedder, embedder_from_config};
pub use registry::{RegistryFileLoader, RegistryLoadError};
