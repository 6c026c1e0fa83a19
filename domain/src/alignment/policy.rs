//! Alignment policy: the floors each namespace is ranked with

use crate::core::error::DomainError;
use crate::matching::ranker::Thresholds;
use serde::{Deserialize, Serialize};

/// Thresholds for tool names and argument keys, plus the semantic switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPolicy {
    /// Floors for tool-name candidates
    pub tool_name: Thresholds,
    /// Floors for argument-key candidates
    pub tool_args: Thresholds,
    /// When false, only the lexical channel is scored and no embeddings are needed
    pub semantic_enabled: bool,
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self {
            tool_name: Thresholds::new(0.7, 0.85),
            tool_args: Thresholds::new(0.7, 0.85),
            semantic_enabled: true,
        }
    }
}

impl AlignmentPolicy {
    pub fn new(tool_name: Thresholds, tool_args: Thresholds) -> Self {
        Self {
            tool_name,
            tool_args,
            semantic_enabled: true,
        }
    }

    /// Same floors, semantic channel off
    pub fn lexical_only(mut self) -> Self {
        self.semantic_enabled = false;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let checks = [
            ("tool_name_lexical_threshold", self.tool_name.lexical),
            ("tool_name_semantic_threshold", self.tool_name.semantic),
            ("tool_args_lexical_threshold", self.tool_args.lexical),
            ("tool_args_semantic_threshold", self.tool_args.semantic),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = AlignmentPolicy::default();
        assert!(policy.validate().is_ok());
        assert!(policy.semantic_enabled);
        assert!(!policy.lexical_only().semantic_enabled);
    }

    #[test]
    fn test_out_of_range_threshold() {
        let policy = AlignmentPolicy::new(Thresholds::new(0.7, 0.8), Thresholds::new(1.5, 0.8));
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("tool_args_lexical_threshold"));

        let policy = AlignmentPolicy::new(Thresholds::new(f64::NAN, 0.8), Thresholds::new(0.7, 0.8));
        assert!(policy.validate().is_err());
    }
}
