//! Candidate ranker
//!
//! Scores an invoked identifier against every identifier of one namespace
//! (tool names, or one tool's parameter names) on two channels and orders the
//! eligible candidates deterministically.
//!
//! # Eligibility and blend
//!
//! A candidate is eligible when it clears **either** floor:
//! `lexical >= thresholds.lexical || semantic >= thresholds.semantic`.
//! The Combined Score is `max(lexical, semantic)`, so a decisive signal on one
//! channel is not diluted by a weak one on the other.
//!
//! # Ordering
//!
//! | Key | Direction |
//! |-----|-----------|
//! | Combined Score | descending |
//! | Lexical score | descending |
//! | Identifier length (chars) | ascending |
//! | Identifier | lexicographic |
//!
//! The result does not depend on the iteration order of the namespace.

use super::lexical::lexical_score;
use super::semantic::InvokedScorer;
use super::Score;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Independent floors for the two scoring channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum lexical score
    pub lexical: Score,
    /// Minimum semantic score
    pub semantic: Score,
}

impl Thresholds {
    pub fn new(lexical: Score, semantic: Score) -> Self {
        Self { lexical, semantic }
    }
}

/// A registry identifier scored against an invoked identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Registry identifier (tool name or parameter name)
    pub identifier: String,
    /// Lexical score
    pub lexical: Score,
    /// Semantic score (0 when semantic scoring is disabled)
    pub semantic: Score,
}

impl Candidate {
    pub fn new(identifier: impl Into<String>, lexical: Score, semantic: Score) -> Self {
        Self {
            identifier: identifier.into(),
            lexical,
            semantic,
        }
    }

    /// An exact match: certain on both channels
    pub fn exact(identifier: impl Into<String>) -> Self {
        Self::new(identifier, 1.0, 1.0)
    }

    /// Combined Score: the stronger of the two channels
    pub fn combined(&self) -> Score {
        self.lexical.max(self.semantic)
    }

    /// Ranking order: `Less` means `self` ranks ahead of `other`
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .combined()
            .total_cmp(&self.combined())
            .then_with(|| other.lexical.total_cmp(&self.lexical))
            .then_with(|| {
                self.identifier
                    .chars()
                    .count()
                    .cmp(&other.identifier.chars().count())
            })
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (lexical {:.3}, semantic {:.3})",
            self.identifier, self.lexical, self.semantic
        )
    }
}

/// What a ranking says about the top of the list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankDecision<'a> {
    /// No candidate cleared either floor
    NoMatch,
    /// The top candidate is strictly ahead on Combined Score
    Unique(&'a Candidate),
    /// The two best candidates share the top Combined Score
    Tied(&'a Candidate, &'a Candidate),
}

/// Ranked candidates for one invoked identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Eligible candidates in ranking order
    pub eligible: Vec<Candidate>,
    /// Best candidate that cleared neither floor, kept for diagnostics
    pub best_ineligible: Option<Candidate>,
}

impl Ranking {
    pub fn top(&self) -> Option<&Candidate> {
        self.eligible.first()
    }

    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Best candidate overall, eligible or not
    pub fn best(&self) -> Option<&Candidate> {
        self.top().or(self.best_ineligible.as_ref())
    }

    pub fn decision(&self) -> RankDecision<'_> {
        match self.eligible.as_slice() {
            [] => RankDecision::NoMatch,
            [top] => RankDecision::Unique(top),
            [top, runner_up, ..] => {
                if top.combined() == runner_up.combined() {
                    RankDecision::Tied(top, runner_up)
                } else {
                    RankDecision::Unique(top)
                }
            }
        }
    }
}

/// Rank `identifiers` against `invoked`
///
/// `semantic` is `None` when semantic scoring is disabled; the semantic score
/// is then reported as 0 and only the lexical floor decides eligibility.
pub fn rank<'i>(
    invoked: &str,
    identifiers: impl IntoIterator<Item = &'i str>,
    thresholds: Thresholds,
    semantic: Option<&InvokedScorer<'_>>,
) -> Result<Ranking, DomainError> {
    let mut eligible = Vec::new();
    let mut ineligible: Vec<Candidate> = Vec::new();

    for identifier in identifiers {
        let lexical = lexical_score(invoked, identifier);
        let semantic_score = match semantic {
            Some(invoked_scorer) => Some(invoked_scorer.score(identifier)?),
            None => None,
        };

        let passes_lexical = lexical >= thresholds.lexical;
        let passes_semantic = semantic_score.is_some_and(|s| s >= thresholds.semantic);
        let candidate = Candidate::new(identifier, lexical, semantic_score.unwrap_or(0.0));

        if passes_lexical || passes_semantic {
            eligible.push(candidate);
        } else {
            ineligible.push(candidate);
        }
    }

    eligible.sort_by(Candidate::ranking_cmp);
    let best_ineligible = ineligible.into_iter().min_by(Candidate::ranking_cmp);

    Ok(Ranking {
        eligible,
        best_ineligible,
    })
}
