//! Tool call alignment
//!
//! Turns a [`RawToolCall`](crate::tool::RawToolCall) into an
//! [`AlignmentOutcome`]:
//!
//! ```text
//! RawToolCall ─▶ ToolNameResolver ─▶ ArgumentAligner ─▶ AlignedCall
//!                      │                    │
//!                      └──── Rejection ◀────┘
//! ```
//!
//! 1. [`resolver`]: exact name, or a unique best tool by Combined Score
//! 2. [`aligner`]: key remapping, [`coercion`] of values, required check
//! 3. [`pipeline`]: runs both with one [`AlignmentPolicy`] and short-circuits
//!    on the first rejection
//!
//! Rejections are values, not errors. The only `Err` that leaves the
//! pipeline is an unavailable embedding.

pub mod aligner;
pub mod coercion;
pub mod outcome;
pub mod pipeline;
pub mod policy;
pub mod resolver;

pub use aligner::{ArgumentAligner, ArgumentAlignment};
pub use outcome::{
    AlignedCall, AlignmentOutcome, AlignmentStage, Diagnostic, Rejection, RejectionReason,
};
pub use pipeline::AlignmentPipeline;
pub use policy::AlignmentPolicy;
pub use resolver::{NameResolution, ToolNameResolver};
