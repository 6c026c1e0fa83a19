//! Configuration file loading for tool-align
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOL_ALIGN_*` environment variables (nested keys split on `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./tool-align.toml` or `./.tool-align.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tool-align/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, EmbeddingProvider, FileAlignmentConfig, FileConfig,
    FileEmbeddingConfig, FileRegistryConfig,
};
pub use loader::ConfigLoader;
