//! Alignment pipeline: name resolution, then argument alignment

use super::aligner::{ArgumentAligner, ArgumentAlignment};
use super::outcome::{AlignedCall, AlignmentOutcome, Diagnostic};
use super::policy::AlignmentPolicy;
use super::resolver::{NameResolution, ToolNameResolver};
use crate::core::error::DomainError;
use crate::core::string::truncate;
use crate::matching::semantic::{QueryEmbeddings, SemanticScorer};
use crate::tool::entities::RawToolCall;
use crate::tool::registry::ToolRegistry;
use std::collections::BTreeSet;
use std::sync::Arc;

const MAX_ECHOED_ARGUMENTS: usize = 120;

/// Stateless alignment over a shared, immutable registry
///
/// Cloning is cheap (the registry sits behind an `Arc`) and `align` takes
/// `&self`, so one pipeline can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct AlignmentPipeline {
    registry: Arc<ToolRegistry>,
    policy: AlignmentPolicy,
}

impl AlignmentPipeline {
    pub fn new(registry: Arc<ToolRegistry>, policy: AlignmentPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &AlignmentPolicy {
        &self.policy
    }

    /// Same registry and floors with the semantic channel turned off
    pub fn lexical_only(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            policy: self.policy.lexical_only(),
        }
    }

    /// Invoked strings whose embeddings `align` will ask for
    ///
    /// Excludes the tool name when it is an exact registry name and anything
    /// the registry cache already covers. Empty when semantic scoring is off.
    pub fn query_identifiers(&self, call: &RawToolCall) -> Vec<String> {
        if !self.policy.semantic_enabled {
            return Vec::new();
        }

        let mut wanted = BTreeSet::new();
        if !self.registry.contains(&call.name) {
            wanted.insert(call.name.as_str());
        }
        wanted.extend(call.arguments.keys().map(|k| k.as_str()));

        wanted
            .into_iter()
            .filter(|text| self.registry.embedding(text).is_none())
            .map(String::from)
            .collect()
    }

    /// Align one raw call
    ///
    /// Every malformed call yields an [`AlignmentOutcome`]. The only error is
    /// [`DomainError::EmbeddingUnavailable`]: a query embedding is missing or
    /// has the wrong dimensionality.
    pub fn align(
        &self,
        call: &RawToolCall,
        query: &QueryEmbeddings,
    ) -> Result<AlignmentOutcome, DomainError> {
        let scorer = SemanticScorer::new(&self.registry, query);
        let semantic = self.policy.semantic_enabled.then_some(&scorer);

        let resolver = ToolNameResolver::new(&self.registry, self.policy.tool_name);
        let (schema, tool_match) = match resolver.resolve(&call.name, semantic)? {
            NameResolution::Resolved { schema, candidate } => (schema, candidate),
            NameResolution::Rejected(rejection) => {
                return Ok(AlignmentOutcome::Rejected(rejection));
            }
        };

        let unparsed = call
            .unparsed_arguments
            .as_deref()
            .map(|raw| Diagnostic::UnparsedArguments {
                raw: truncate(raw, MAX_ECHOED_ARGUMENTS),
            });

        let aligner = ArgumentAligner::new(schema, self.policy.tool_args);
        match aligner.align(&call.arguments, semantic)? {
            ArgumentAlignment::Aligned {
                arguments,
                mut diagnostics,
            } => {
                if let Some(diagnostic) = unparsed {
                    diagnostics.insert(0, diagnostic);
                }
                Ok(AlignmentOutcome::Aligned(AlignedCall {
                    tool_name: schema.name.clone(),
                    handle: schema.handle(),
                    tool_match,
                    arguments,
                    diagnostics,
                }))
            }
            ArgumentAlignment::Rejected(mut rejection) => {
                if let Some(diagnostic) = unparsed {
                    rejection.diagnostics.insert(0, diagnostic);
                }
                Ok(AlignmentOutcome::Rejected(
                    rejection.with_tool_match(tool_match),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::outcome::{AlignmentStage, Diagnostic, RejectionReason};
    use crate::matching::ranker::Thresholds;
    use crate::tool::entities::{ParamType, ToolParameter, ToolSchema};
    use serde_json::json;

    fn schemas() -> Vec<ToolSchema> {
        vec![
            ToolSchema::new("create_script")
                .with_parameter(ToolParameter::required("path", ParamType::String))
                .with_parameter(ToolParameter::optional("args", ParamType::Array)),
            ToolSchema::new("read_file")
                .with_parameter(ToolParameter::required("path", ParamType::String))
                .with_parameter(ToolParameter::optional("limit", ParamType::Integer)),
            ToolSchema::new("run_command")
                .with_parameter(ToolParameter::required("command", ParamType::String)),
        ]
    }

    fn lexical_pipeline() -> AlignmentPipeline {
        let registry = ToolRegistry::builder().register_all(schemas()).build().unwrap();
        let policy =
            AlignmentPolicy::new(Thresholds::new(0.7, 0.85), Thresholds::new(0.7, 0.85)).lexical_only();
        AlignmentPipeline::new(Arc::new(registry), policy)
    }

    /// Two-dimensional toy embeddings: x axis "files", y axis "processes"
    fn semantic_pipeline() -> AlignmentPipeline {
        let registry = ToolRegistry::builder()
            .register_all(schemas())
            .with_embedding("create_script", vec![0.6, 0.8])
            .with_embedding("read_file", vec![1.0, 0.0])
            .with_embedding("run_command", vec![0.0, 1.0])
            .with_embedding("path", vec![1.0, 0.1])
            .with_embedding("args", vec![0.1, 1.0])
            .with_embedding("limit", vec![0.7, 0.7])
            .with_embedding("command", vec![0.0, 1.0])
            .build()
            .unwrap();
        AlignmentPipeline::new(Arc::new(registry), AlignmentPolicy::default())
    }

    #[test]
    fn test_end_to_end_typo_correction() {
        let pipeline = lexical_pipeline();
        let call = RawToolCall::new("creat_script").with_arg("pathh", "main.py");
        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();

        let aligned = outcome.aligned().expect("aligned");
        assert_eq!(aligned.tool_name, "create_script");
        assert_eq!(aligned.handle.as_str(), "create_script");
        assert_eq!(aligned.arguments.len(), 1);
        assert_eq!(aligned.get("path"), Some(&json!("main.py")));
    }

    #[test]
    fn test_exact_call_is_clean() {
        let pipeline = lexical_pipeline();
        let call = RawToolCall::new("read_file")
            .with_arg("path", "README.md")
            .with_arg("limit", 10);
        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();
        let aligned = outcome.aligned().unwrap();
        assert!(aligned.is_exact());
        assert_eq!(aligned.tool_match.combined(), 1.0);
    }

    #[test]
    fn test_unknown_tool_short_circuits() {
        let pipeline = lexical_pipeline();
        let call = RawToolCall::new("launch_missiles").with_arg("target", "moon");
        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.stage, AlignmentStage::ToolName);
        assert_eq!(rejection.reason, RejectionReason::UnknownTool);
    }

    #[test]
    fn test_argument_stage_rejection() {
        let pipeline = lexical_pipeline();
        let call = RawToolCall::new("read_fil").with_arg("limit", "ten");
        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.stage, AlignmentStage::Arguments);
        assert_eq!(outcome.reason(), Some(RejectionReason::ArgumentTypeMismatch));
        assert_eq!(rejection.parameters, vec!["limit"]);
    }

    #[test]
    fn test_argument_rejection_names_resolved_tool() {
        let pipeline = lexical_pipeline();
        let outcome = pipeline
            .align(&RawToolCall::new("creat_script"), &QueryEmbeddings::new())
            .unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.reason, RejectionReason::MissingRequiredArgument);

        let tool_match = rejection.tool_match.as_ref().expect("resolved tool");
        assert_eq!(tool_match.identifier, "create_script");
        assert!(tool_match.lexical > 0.9);

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["tool_match"]["identifier"], "create_script");
    }

    #[test]
    fn test_name_rejection_has_no_resolved_tool() {
        let pipeline = lexical_pipeline();
        let outcome = pipeline
            .align(&RawToolCall::new("launch_missiles"), &QueryEmbeddings::new())
            .unwrap();
        assert!(outcome.rejection().unwrap().tool_match.is_none());
    }

    #[test]
    fn test_unparsed_argument_string_is_reported() {
        let pipeline = lexical_pipeline();
        let call: RawToolCall = serde_json::from_value(json!({
            "name": "create_script",
            "arguments": "path=main.py"
        }))
        .unwrap();

        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.reason, RejectionReason::MissingRequiredArgument);
        assert_eq!(
            rejection.diagnostics.first(),
            Some(&Diagnostic::UnparsedArguments {
                raw: "path=main.py".to_string()
            })
        );
    }

    #[test]
    fn test_unparsed_argument_string_without_required_params_aligns() {
        let registry = ToolRegistry::builder()
            .register(ToolSchema::new("list_files"))
            .build()
            .unwrap();
        let pipeline = AlignmentPipeline::new(
            Arc::new(registry),
            AlignmentPolicy::default().lexical_only(),
        );
        let mut call = RawToolCall::new("list_files");
        call.unparsed_arguments = Some("x".repeat(500));

        let outcome = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();
        let aligned = outcome.aligned().expect("aligned");
        assert!(aligned.arguments.is_empty());
        match aligned.diagnostics.as_slice() {
            [Diagnostic::UnparsedArguments { raw }] => {
                assert!(raw.len() <= MAX_ECHOED_ARGUMENTS);
                assert!(raw.ends_with("..."));
            }
            other => panic!("unexpected diagnostics: {:?}", other),
        }
        assert!(!aligned.is_exact());
    }

    #[test]
    fn test_semantic_resolution() {
        let pipeline = semantic_pipeline();
        let call = RawToolCall::new("bash").with_arg("cmd", "ls -la");
        let query = QueryEmbeddings::new()
            .with("bash", vec![0.05, 1.0])
            .with("cmd", vec![0.0, 1.0]);

        let outcome = pipeline.align(&call, &query).unwrap();
        let aligned = outcome.aligned().expect("aligned");
        assert_eq!(aligned.tool_name, "run_command");
        assert_eq!(aligned.get("command"), Some(&json!("ls -la")));
        assert!(aligned.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::RemappedArgument { from, to, .. } if from == "cmd" && to == "command"
        )));
    }

    #[test]
    fn test_missing_query_embedding_is_error() {
        let pipeline = semantic_pipeline();
        let call = RawToolCall::new("bash");
        let err = pipeline.align(&call, &QueryEmbeddings::new()).unwrap_err();
        assert!(err.is_embedding_unavailable());

        // the same call degrades cleanly when the caller falls back to lexical only
        let outcome = pipeline
            .lexical_only()
            .align(&call, &QueryEmbeddings::new())
            .unwrap();
        assert_eq!(outcome.reason(), Some(RejectionReason::UnknownTool));
    }

    #[test]
    fn test_query_identifiers() {
        let pipeline = semantic_pipeline();
        let call = RawToolCall::new("read_file")
            .with_arg("path", "a")
            .with_arg("max_lines", 5);
        assert_eq!(pipeline.query_identifiers(&call), vec!["max_lines"]);

        let call = RawToolCall::new("bash").with_arg("cmd", "ls");
        assert_eq!(pipeline.query_identifiers(&call), vec!["bash", "cmd"]);

        assert!(pipeline.lexical_only().query_identifiers(&call).is_empty());
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let pipeline = lexical_pipeline();
        let call = RawToolCall::new("creat_script")
            .with_arg("pathh", "main.py")
            .with_arg("argz", "-v")
            .with_arg("noise", true);
        let expected = pipeline.align(&call, &QueryEmbeddings::new()).unwrap();

        let outcomes: Vec<AlignmentOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let pipeline = pipeline.clone();
                    let call = call.clone();
                    scope.spawn(move || pipeline.align(&call, &QueryEmbeddings::new()).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(outcomes.iter().all(|o| *o == expected));
    }

    #[test]
    fn test_concurrent_callers_agree_with_embeddings() {
        let pipeline = semantic_pipeline();
        let call = RawToolCall::new("bash")
            .with_arg("cmd", "ls -la")
            .with_arg("noise", 1);
        let query = QueryEmbeddings::new()
            .with("bash", vec![0.05, 1.0])
            .with("cmd", vec![0.0, 1.0])
            .with("noise", vec![1.0, -1.0]);
        let expected = pipeline.align(&call, &query).unwrap();
        assert_eq!(expected.aligned().unwrap().tool_name, "run_command");

        let outcomes: Vec<AlignmentOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let pipeline = pipeline.clone();
                    let (call, query) = (&call, &query);
                    scope.spawn(move || pipeline.align(call, query).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(outcomes.iter().all(|o| *o == expected));
    }
}
