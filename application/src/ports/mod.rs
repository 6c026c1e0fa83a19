//! Ports (interfaces) for external adapters
//!
//! These traits define the boundaries between the application layer
//! and infrastructure layer.

pub mod embedder;
