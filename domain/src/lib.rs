//! Domain layer for tool-align
//!
//! This crate contains the tool call alignment engine: entities, scoring,
//! ranking and the alignment pipeline. It performs no I/O and owns no async
//! code; embeddings arrive as plain vectors.
//!
//! # Core Concepts
//!
//! ## Registry
//!
//! An immutable [`ToolRegistry`] of [`ToolSchema`]s plus the embedding of
//! every registry identifier, computed once at construction.
//!
//! ## Two channels, two floors
//!
//! - **Lexical**: normalized edit distance, catches typos (`creat_script`)
//! - **Semantic**: embedding cosine, catches paraphrases (`bash` → `run_command`)
//!
//! A candidate is eligible when it clears either floor; its Combined Score is
//! the stronger of the two.
//!
//! ## Outcome
//!
//! [`AlignmentPipeline::align`] returns an [`AlignedCall`] or a [`Rejection`]
//! with a stable [`RejectionReason`] code.

pub mod alignment;
pub mod core;
pub mod matching;
pub mod tool;

// Re-export commonly used types
pub use alignment::{
    AlignedCall, AlignmentOutcome, AlignmentPipeline, AlignmentPolicy, AlignmentStage, Diagnostic,
    Rejection, RejectionReason,
};
pub use core::error::DomainError;
pub use matching::{Candidate, Embedding, QueryEmbeddings, Score, Thresholds};
pub use tool::{
    ParamType, RawToolCall, ToolHandle, ToolParameter, ToolRegistry, ToolRegistryBuilder,
    ToolSchema,
};
