//! Alignment outcome value objects
//!
//! Every alignment call ends in exactly one [`AlignmentOutcome`]: an
//! [`AlignedCall`] ready for the executing collaborator, or a [`Rejection`]
//! whose [`RejectionReason`] is the stable code callers branch on.
//!
//! | Reason | Stage | Meaning |
//! |--------|-------|---------|
//! | `unknown_tool` | tool_name | No tool cleared either floor |
//! | `ambiguous_tool_name` | tool_name | Two tools share the top Combined Score |
//! | `ambiguous_argument` | arguments | Two parameters share the top score for one key |
//! | `argument_type_mismatch` | arguments | A value cannot be coerced to its declared type |
//! | `missing_required_argument` | arguments | Required parameters have no value |

use crate::core::string::truncate;
use crate::matching::ranker::Candidate;
use crate::matching::Score;
use crate::tool::entities::{ParamType, ToolHandle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const MAX_ECHO_LEN: usize = 64;

/// Stable reason codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    UnknownTool,
    AmbiguousToolName,
    AmbiguousArgument,
    ArgumentTypeMismatch,
    MissingRequiredArgument,
}

impl RejectionReason {
    pub fn as_str(&self) -> &str {
        match self {
            RejectionReason::UnknownTool => "unknown_tool",
            RejectionReason::AmbiguousToolName => "ambiguous_tool_name",
            RejectionReason::AmbiguousArgument => "ambiguous_argument",
            RejectionReason::ArgumentTypeMismatch => "argument_type_mismatch",
            RejectionReason::MissingRequiredArgument => "missing_required_argument",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pipeline stage a rejection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStage {
    ToolName,
    Arguments,
}

impl AlignmentStage {
    pub fn as_str(&self) -> &str {
        match self {
            AlignmentStage::ToolName => "tool_name",
            AlignmentStage::Arguments => "arguments",
        }
    }
}

impl std::fmt::Display for AlignmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-fatal corrections and discards recorded while aligning arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An invoked key was mapped onto a differently spelled parameter
    RemappedArgument {
        from: String,
        to: String,
        score: Score,
    },
    /// An invoked key matched no parameter and was discarded
    DroppedArgument {
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        best: Option<Candidate>,
    },
    /// Two keys mapped to one parameter; `key` lost to `kept`
    ShadowedArgument {
        key: String,
        parameter: String,
        kept: String,
    },
    /// An explicit null was treated as "not supplied"
    NullArgument { key: String },
    /// A value was converted to the parameter's declared type
    CoercedValue {
        parameter: String,
        from: String,
        to: ParamType,
    },
    /// The `arguments` string held no JSON object; the call had no arguments
    UnparsedArguments { raw: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::RemappedArgument { from, to, score } => {
                write!(f, "remapped '{}' -> '{}' (score {:.3})", from, to, score)
            }
            Diagnostic::DroppedArgument { key, best } => {
                write!(f, "dropped unmatched argument '{}'", key)?;
                if let Some(best) = best {
                    write!(f, " (closest: {})", best)?;
                }
                Ok(())
            }
            Diagnostic::ShadowedArgument {
                key,
                parameter,
                kept,
            } => write!(
                f,
                "dropped '{}': parameter '{}' already supplied by '{}'",
                key, parameter, kept
            ),
            Diagnostic::NullArgument { key } => write!(f, "ignored null argument '{}'", key),
            Diagnostic::CoercedValue {
                parameter,
                from,
                to,
            } => write!(f, "coerced '{}' from {} to {}", parameter, from, to),
            Diagnostic::UnparsedArguments { raw } => {
                write!(f, "ignored arguments that are not a JSON object: {}", raw)
            }
        }
    }
}

/// A corrected call whose name and keys come from the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedCall {
    /// Canonical tool name
    pub tool_name: String,
    /// Dispatch handle for the executing collaborator
    pub handle: ToolHandle,
    /// How the invoked name matched the tool
    pub tool_match: Candidate,
    /// Declared parameter name → coerced value
    pub arguments: BTreeMap<String, Value>,
    /// Corrections applied along the way
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl AlignedCall {
    pub fn get(&self, parameter: &str) -> Option<&Value> {
        self.arguments.get(parameter)
    }

    /// True when the call needed no correction at all
    pub fn is_exact(&self) -> bool {
        self.tool_match.lexical == 1.0 && self.diagnostics.is_empty()
    }
}

/// Why a call could not be aligned, with what was learned on the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub stage: AlignmentStage,
    pub reason: RejectionReason,
    /// Tool the name stage resolved to; set for argument-stage rejections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_match: Option<Candidate>,
    /// Best candidate considered at the failing step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_candidate: Option<Candidate>,
    /// Offending parameter names (type mismatch, missing, ambiguous key)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    /// Human-readable explanation
    pub message: String,
    /// Diagnostics gathered before the failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Rejection {
    pub fn new(stage: AlignmentStage, reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            stage,
            reason,
            tool_match: None,
            best_candidate: None,
            parameters: Vec::new(),
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn unknown_tool(invoked: &str, best: Option<Candidate>) -> Self {
        let mut rejection = Self::new(
            AlignmentStage::ToolName,
            RejectionReason::UnknownTool,
            format!("Unknown tool: {}", truncate(invoked, MAX_ECHO_LEN)),
        );
        rejection.best_candidate = best;
        rejection
    }

    pub fn ambiguous_tool_name(invoked: &str, top: &Candidate, runner_up: &Candidate) -> Self {
        let mut rejection = Self::new(
            AlignmentStage::ToolName,
            RejectionReason::AmbiguousToolName,
            format!(
                "Tool name '{}' matches '{}' and '{}' equally well",
                truncate(invoked, MAX_ECHO_LEN),
                top.identifier,
                runner_up.identifier
            ),
        );
        rejection.best_candidate = Some(top.clone());
        rejection
    }

    pub fn ambiguous_argument(key: &str, top: &Candidate, runner_up: &Candidate) -> Self {
        let mut rejection = Self::new(
            AlignmentStage::Arguments,
            RejectionReason::AmbiguousArgument,
            format!(
                "Argument '{}' matches '{}' and '{}' equally well",
                truncate(key, MAX_ECHO_LEN),
                top.identifier,
                runner_up.identifier
            ),
        );
        rejection.best_candidate = Some(top.clone());
        rejection.parameters = vec![top.identifier.clone(), runner_up.identifier.clone()];
        rejection
    }

    pub fn type_mismatch(parameter: &str, expected: ParamType, found: &str) -> Self {
        let mut rejection = Self::new(
            AlignmentStage::Arguments,
            RejectionReason::ArgumentTypeMismatch,
            format!(
                "Argument '{}' expects {}, got {}",
                parameter, expected, found
            ),
        );
        rejection.parameters = vec![parameter.to_string()];
        rejection
    }

    pub fn missing_required(parameters: Vec<String>) -> Self {
        let mut rejection = Self::new(
            AlignmentStage::Arguments,
            RejectionReason::MissingRequiredArgument,
            format!("Missing required arguments: {}", parameters.join(", ")),
        );
        rejection.parameters = parameters;
        rejection
    }

    pub fn with_best_candidate(mut self, candidate: Candidate) -> Self {
        self.best_candidate = Some(candidate);
        self
    }

    pub fn with_tool_match(mut self, candidate: Candidate) -> Self {
        self.tool_match = Some(candidate);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.reason, self.message)
    }
}

/// Result of aligning one raw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlignmentOutcome {
    Aligned(AlignedCall),
    Rejected(Rejection),
}

impl AlignmentOutcome {
    pub fn is_aligned(&self) -> bool {
        matches!(self, AlignmentOutcome::Aligned(_))
    }

    pub fn aligned(&self) -> Option<&AlignedCall> {
        match self {
            AlignmentOutcome::Aligned(call) => Some(call),
            AlignmentOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AlignmentOutcome::Aligned(_) => None,
            AlignmentOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        self.rejection().map(|r| r.reason)
    }
}
