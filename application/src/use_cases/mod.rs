//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod align_tool_call;
pub mod build_registry;
