//! Application-level configuration.
//!
//! - [`AlignmentConfig`]: thresholds and the semantic switch for alignment

pub mod alignment_config;

pub use alignment_config::AlignmentConfig;
