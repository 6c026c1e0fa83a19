//! Application layer for tool-align
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AlignmentConfig;
pub use ports::embedder::{EmbedderPort, EmbeddingError};
pub use use_cases::align_tool_call::{AlignToolCallError, AlignToolCallUseCase};
pub use use_cases::build_registry::{BuildRegistryError, BuildRegistryUseCase};
