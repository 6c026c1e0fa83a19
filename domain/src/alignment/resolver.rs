//! Tool name resolver

use super::outcome::Rejection;
use crate::core::error::DomainError;
use crate::matching::ranker::{Candidate, RankDecision, Thresholds, rank};
use crate::matching::semantic::SemanticScorer;
use crate::tool::entities::ToolSchema;
use crate::tool::registry::ToolRegistry;

/// Outcome of resolving an invoked tool name
#[derive(Debug, Clone, PartialEq)]
pub enum NameResolution<'r> {
    Resolved {
        schema: &'r ToolSchema,
        candidate: Candidate,
    },
    Rejected(Rejection),
}

/// Resolves an invoked name against every tool in the registry
#[derive(Debug, Clone, Copy)]
pub struct ToolNameResolver<'r> {
    registry: &'r ToolRegistry,
    thresholds: Thresholds,
}

impl<'r> ToolNameResolver<'r> {
    pub fn new(registry: &'r ToolRegistry, thresholds: Thresholds) -> Self {
        Self {
            registry,
            thresholds,
        }
    }

    /// Resolve `invoked` to a schema, or explain why not
    ///
    /// An exact registry name resolves immediately, without ranking and
    /// without touching the semantic channel.
    pub fn resolve(
        &self,
        invoked: &str,
        semantic: Option<&SemanticScorer<'_>>,
    ) -> Result<NameResolution<'r>, DomainError> {
        if let Some(schema) = self.registry.get(invoked) {
            return Ok(NameResolution::Resolved {
                schema,
                candidate: Candidate::exact(&schema.name),
            });
        }

        let invoked_scorer = semantic.map(|s| s.for_invoked(invoked)).transpose()?;
        let ranking = rank(
            invoked,
            self.registry.names(),
            self.thresholds,
            invoked_scorer.as_ref(),
        )?;

        let resolution = match ranking.decision() {
            RankDecision::Unique(top) => match self.registry.get(&top.identifier) {
                Some(schema) => NameResolution::Resolved {
                    schema,
                    candidate: top.clone(),
                },
                None => NameResolution::Rejected(Rejection::unknown_tool(invoked, Some(top.clone()))),
            },
            RankDecision::Tied(top, runner_up) => {
                NameResolution::Rejected(Rejection::ambiguous_tool_name(invoked, top, runner_up))
            }
            RankDecision::NoMatch => {
                NameResolution::Rejected(Rejection::unknown_tool(invoked, ranking.best().cloned()))
            }
        };
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::outcome::RejectionReason;
    use crate::matching::semantic::QueryEmbeddings;

    fn registry() -> ToolRegistry {
        ToolRegistry::builder()
            .register(ToolSchema::new("create_script"))
            .register(ToolSchema::new("read_file"))
            .register(ToolSchema::new("write_file"))
            .build()
            .unwrap()
    }

    fn rejection(resolution: NameResolution<'_>) -> Rejection {
        match resolution {
            NameResolution::Rejected(r) => r,
            NameResolution::Resolved { schema, .. } => panic!("unexpectedly resolved {}", schema.name),
        }
    }

    #[test]
    fn test_exact_match_is_immediate() {
        let registry = registry();
        // thresholds that nothing could clear do not matter for exact names
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(1.0, 1.0));
        match resolver.resolve("read_file", None).unwrap() {
            NameResolution::Resolved { schema, candidate } => {
                assert_eq!(schema.name, "read_file");
                assert_eq!(candidate.combined(), 1.0);
                assert_eq!(candidate.lexical, 1.0);
                assert_eq!(candidate.semantic, 1.0);
            }
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_match_skips_semantic_channel() {
        // no embeddings anywhere: scoring would fail, so the exact path must skip the semantic channel
        let registry = registry();
        let query = QueryEmbeddings::new();
        let scorer = SemanticScorer::new(&registry, &query);
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        assert!(matches!(
            resolver.resolve("write_file", Some(&scorer)).unwrap(),
            NameResolution::Resolved { .. }
        ));
    }

    #[test]
    fn test_typo_resolves() {
        let registry = registry();
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        match resolver.resolve("creat_script", None).unwrap() {
            NameResolution::Resolved { schema, candidate } => {
                assert_eq!(schema.name, "create_script");
                assert!(candidate.lexical > 0.9);
            }
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tool_carries_best_candidate() {
        let registry = registry();
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        let rejection = rejection(resolver.resolve("delete_everything", None).unwrap());
        assert_eq!(rejection.reason, RejectionReason::UnknownTool);
        assert!(rejection.best_candidate.is_some());
    }

    #[test]
    fn test_empty_registry_is_unknown_tool() {
        let registry = ToolRegistry::default();
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        let rejection = rejection(resolver.resolve("anything", None).unwrap());
        assert_eq!(rejection.reason, RejectionReason::UnknownTool);
        assert!(rejection.best_candidate.is_none());
    }

    #[test]
    fn test_tie_is_ambiguous() {
        // "xead_file" is one substitution away from "read_file" and "head_file"
        let registry = ToolRegistry::builder()
            .register(ToolSchema::new("read_file"))
            .register(ToolSchema::new("head_file"))
            .build()
            .unwrap();
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        let rejection = rejection(resolver.resolve("xead_file", None).unwrap());
        assert_eq!(rejection.reason, RejectionReason::AmbiguousToolName);
        // ties keep the deterministic order: same scores and length, "head_file" sorts first
        assert_eq!(rejection.best_candidate.unwrap().identifier, "head_file");
    }

    #[test]
    fn test_missing_query_embedding_propagates() {
        let registry = registry();
        let query = QueryEmbeddings::new();
        let scorer = SemanticScorer::new(&registry, &query);
        let resolver = ToolNameResolver::new(&registry, Thresholds::new(0.7, 0.85));
        let err = resolver.resolve("creat_script", Some(&scorer)).unwrap_err();
        assert!(err.is_embedding_unavailable());
    }
}
