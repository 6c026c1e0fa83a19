//! Matching primitives
//!
//! Two independent scoring channels feed one ranker:
//!
//! ```text
//! invoked ──┬─ lexical_score ──┐
//!           │                  ├─▶ Candidate ─▶ rank ─▶ Ranking
//!           └─ InvokedScorer ──┘
//! ```
//!
//! - [`lexical`]: normalized edit distance, pure
//! - [`semantic`]: cosine similarity over embeddings
//! - [`ranker`]: eligibility floors, max-of-two blend, deterministic order

pub mod lexical;
pub mod ranker;
pub mod semantic;

/// A similarity in `[0.0, 1.0]`; 1.0 is a certain match
pub type Score = f64;

pub use lexical::lexical_score;
pub use ranker::{Candidate, RankDecision, Ranking, Thresholds, rank};
pub use semantic::{Embedding, InvokedScorer, QueryEmbeddings, SemanticScorer, cosine_similarity};
