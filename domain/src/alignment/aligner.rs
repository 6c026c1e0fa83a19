//! Argument aligner
//!
//! Maps invoked argument keys onto a resolved tool's parameters, then
//! coerces values and checks required parameters.
//!
//! Keys are processed in sorted order so the outcome never depends on the
//! iteration order of the raw argument map. Unmatched keys are dropped with a
//! diagnostic rather than rejected. When two keys land on the same
//! parameter, an exact key wins over a remapped one, then the higher Combined
//! Score wins, then the lexicographically smaller key.

use super::coercion::coerce;
use super::outcome::{Diagnostic, Rejection};
use crate::core::error::DomainError;
use crate::matching::ranker::{Candidate, RankDecision, Thresholds, rank};
use crate::matching::semantic::SemanticScorer;
use crate::tool::entities::ToolSchema;
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Outcome of aligning the arguments of one call
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentAlignment {
    Aligned {
        arguments: BTreeMap<String, Value>,
        diagnostics: Vec<Diagnostic>,
    },
    Rejected(Rejection),
}

/// An invoked key claiming a parameter
#[derive(Debug)]
struct Claim<'a> {
    key: &'a str,
    candidate: Candidate,
    exact: bool,
}

impl Claim<'_> {
    fn beats(&self, other: &Claim<'_>) -> bool {
        match (self.exact, other.exact) {
            (true, false) => true,
            (false, true) => false,
            _ => {
                let (mine, theirs) = (self.candidate.combined(), other.candidate.combined());
                mine > theirs || (mine == theirs && self.key < other.key)
            }
        }
    }
}

/// Aligns raw arguments against one tool schema
#[derive(Debug, Clone, Copy)]
pub struct ArgumentAligner<'r> {
    schema: &'r ToolSchema,
    thresholds: Thresholds,
}

impl<'r> ArgumentAligner<'r> {
    pub fn new(schema: &'r ToolSchema, thresholds: Thresholds) -> Self {
        Self { schema, thresholds }
    }

    pub fn align(
        &self,
        arguments: &HashMap<String, Value>,
        semantic: Option<&SemanticScorer<'_>>,
    ) -> Result<ArgumentAlignment, DomainError> {
        let mut keys: Vec<&str> = arguments.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();

        let mut diagnostics = Vec::new();
        let mut claims: BTreeMap<String, Claim<'_>> = BTreeMap::new();

        for key in keys {
            if arguments.get(key).is_none_or(Value::is_null) {
                diagnostics.push(Diagnostic::NullArgument {
                    key: key.to_string(),
                });
                continue;
            }

            let claim = if let Some(param) = self.schema.parameter(key) {
                Claim {
                    key,
                    candidate: Candidate::exact(&param.name),
                    exact: true,
                }
            } else {
                let invoked_scorer = semantic.map(|s| s.for_invoked(key)).transpose()?;
                let ranking = rank(
                    key,
                    self.schema.parameter_names(),
                    self.thresholds,
                    invoked_scorer.as_ref(),
                )?;
                match ranking.decision() {
                    RankDecision::Unique(top) => Claim {
                        key,
                        candidate: top.clone(),
                        exact: false,
                    },
                    RankDecision::Tied(top, runner_up) => {
                        return Ok(ArgumentAlignment::Rejected(
                            Rejection::ambiguous_argument(key, top, runner_up)
                                .with_diagnostics(diagnostics),
                        ));
                    }
                    RankDecision::NoMatch => {
                        diagnostics.push(Diagnostic::DroppedArgument {
                            key: key.to_string(),
                            best: ranking.best().cloned(),
                        });
                        continue;
                    }
                }
            };

            match claims.entry(claim.candidate.identifier.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(claim);
                }
                Entry::Occupied(mut slot) => {
                    let parameter = slot.key().clone();
                    if claim.beats(slot.get()) {
                        let loser = slot.insert(claim);
                        diagnostics.push(Diagnostic::ShadowedArgument {
                            key: loser.key.to_string(),
                            parameter,
                            kept: slot.get().key.to_string(),
                        });
                    } else {
                        diagnostics.push(Diagnostic::ShadowedArgument {
                            key: claim.key.to_string(),
                            parameter,
                            kept: slot.get().key.to_string(),
                        });
                    }
                }
            }
        }

        let mut aligned = BTreeMap::new();
        for param in &self.schema.parameters {
            let Some(claim) = claims.get(&param.name) else {
                continue;
            };
            if !claim.exact {
                diagnostics.push(Diagnostic::RemappedArgument {
                    from: claim.key.to_string(),
                    to: param.name.clone(),
                    score: claim.candidate.combined(),
                });
            }

            let Some(raw) = arguments.get(claim.key) else {
                continue;
            };
            match coerce(raw, param.param_type) {
                Ok(coerced) => {
                    if coerced.changed {
                        diagnostics.push(Diagnostic::CoercedValue {
                            parameter: param.name.clone(),
                            from: super::coercion::value_kind(raw).to_string(),
                            to: param.param_type,
                        });
                    }
                    aligned.insert(param.name.clone(), coerced.value);
                }
                Err(mismatch) => {
                    return Ok(ArgumentAlignment::Rejected(
                        Rejection::type_mismatch(&param.name, mismatch.expected, mismatch.found)
                            .with_best_candidate(claim.candidate.clone())
                            .with_diagnostics(diagnostics),
                    ));
                }
            }
        }

        let missing: Vec<String> = self
            .schema
            .required_parameters()
            .filter(|p| !aligned.contains_key(&p.name))
            .map(|p| p.name.clone())
            .collect();
        if !missing.is_empty() {
            return Ok(ArgumentAlignment::Rejected(
                Rejection::missing_required(missing).with_diagnostics(diagnostics),
            ));
        }

        Ok(ArgumentAlignment::Aligned {
            arguments: aligned,
            diagnostics,
        })
    }
}
