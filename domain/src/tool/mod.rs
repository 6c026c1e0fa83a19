//! Tool domain module
//!
//! Defines what a tool looks like to the alignment engine: a [`ToolSchema`]
//! (canonical name, typed parameters, dispatch handle) held in an immutable
//! [`ToolRegistry`], and the untrusted [`RawToolCall`] a model emits.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ RawToolCall  │───▶│ ToolRegistry │───▶│ AlignedCall  │
//! │ (untrusted)  │    │ (schemas +   │    │ (schema keys,│
//! │              │    │  embeddings) │    │  typed args) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! The registry is plain data: it is built once by whoever owns the tool
//! definitions and handed to the pipeline. Nothing here inspects caller
//! types at runtime.

pub mod entities;
pub mod registry;

pub use entities::{ParamType, RawToolCall, ToolHandle, ToolParameter, ToolSchema};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
