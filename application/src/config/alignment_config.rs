//! Alignment configuration: the knobs callers supply when constructing the
//! alignment use case.
//!
//! [`AlignmentConfig`] is the flat, serializable form of the four thresholds
//! plus the semantic switch. It converts into the domain
//! [`AlignmentPolicy`] the pipeline runs with.
//!
//! | Option | Default |
//! |--------|---------|
//! | `tool_name_lexical_threshold` | 0.7 |
//! | `tool_name_semantic_threshold` | 0.85 |
//! | `tool_args_lexical_threshold` | 0.7 |
//! | `tool_args_semantic_threshold` | 0.85 |
//! | `semantic_enabled` | true |

use serde::{Deserialize, Serialize};
use toolalign_domain::{AlignmentPolicy, DomainError, Thresholds};

/// Thresholds for tool-name and argument-key matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Minimum lexical floor for tool-name candidates.
    pub tool_name_lexical_threshold: f64,
    /// Minimum semantic floor for tool-name candidates.
    pub tool_name_semantic_threshold: f64,
    /// Minimum lexical floor for argument-key candidates.
    pub tool_args_lexical_threshold: f64,
    /// Minimum semantic floor for argument-key candidates.
    pub tool_args_semantic_threshold: f64,
    /// Score the semantic channel; requires an embedder.
    pub semantic_enabled: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self::from(AlignmentPolicy::default())
    }
}

impl AlignmentConfig {
    // ==================== Builder Methods ====================

    pub fn with_tool_name_thresholds(mut self, lexical: f64, semantic: f64) -> Self {
        self.tool_name_lexical_threshold = lexical;
        self.tool_name_semantic_threshold = semantic;
        self
    }

    pub fn with_tool_args_thresholds(mut self, lexical: f64, semantic: f64) -> Self {
        self.tool_args_lexical_threshold = lexical;
        self.tool_args_semantic_threshold = semantic;
        self
    }

    pub fn lexical_only(mut self) -> Self {
        self.semantic_enabled = false;
        self
    }

    /// Convert into the domain policy, rejecting thresholds outside `0.0..=1.0`.
    pub fn to_policy(&self) -> Result<AlignmentPolicy, DomainError> {
        let policy = AlignmentPolicy {
            tool_name: Thresholds::new(
                self.tool_name_lexical_threshold,
                self.tool_name_semantic_threshold,
            ),
            tool_args: Thresholds::new(
                self.tool_args_lexical_threshold,
                self.tool_args_semantic_threshold,
            ),
            semantic_enabled: self.semantic_enabled,
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl From<AlignmentPolicy> for AlignmentConfig {
    fn from(policy: AlignmentPolicy) -> Self {
        Self {
            tool_name_lexical_threshold: policy.tool_name.lexical,
            tool_name_semantic_threshold: policy.tool_name.semantic,
            tool_args_lexical_threshold: policy.tool_args.lexical,
            tool_args_semantic_threshold: policy.tool_args.semantic,
            semantic_enabled: policy.semantic_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_policy() {
        let config = AlignmentConfig::default();
        assert_eq!(config.tool_name_lexical_threshold, 0.7);
        assert_eq!(config.tool_args_semantic_threshold, 0.85);
        assert!(config.semantic_enabled);
        assert_eq!(config.to_policy().unwrap(), AlignmentPolicy::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = AlignmentConfig::default()
            .with_tool_name_thresholds(0.8, 0.9)
            .with_tool_args_thresholds(0.6, 0.75)
            .lexical_only();
        let policy = config.to_policy().unwrap();
        assert_eq!(policy.tool_name, Thresholds::new(0.8, 0.9));
        assert_eq!(policy.tool_args, Thresholds::new(0.6, 0.75));
        assert!(!policy.semantic_enabled);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = AlignmentConfig::default().with_tool_name_thresholds(-0.1, 0.9);
        assert!(matches!(
            config.to_policy(),
            Err(DomainError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: AlignmentConfig =
            serde_json::from_str(r#"{"tool_name_lexical_threshold": 0.9}"#).unwrap();
        assert_eq!(config.tool_name_lexical_threshold, 0.9);
        assert_eq!(config.tool_args_lexical_threshold, 0.7);
    }
}
