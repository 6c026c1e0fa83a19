//! Tool registry: the immutable set of schemas alignment matches against

use super::entities::ToolSchema;
use crate::core::error::DomainError;
use crate::matching::semantic::Embedding;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Registry of known tools plus the embedding cache of their identifiers
///
/// Built once through [`ToolRegistryBuilder`] and never mutated afterwards;
/// share it behind an `Arc` across concurrent alignment calls. Embeddings are
/// keyed by identifier text, so a tool name and a parameter name spelled the
/// same share one entry.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolSchema>,
    embeddings: HashMap<String, Embedding>,
    dimensions: Option<usize>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Cached embedding of a registry identifier
    pub fn embedding(&self, identifier: &str) -> Option<&[f32]> {
        self.embeddings.get(identifier).map(|v| v.as_slice())
    }

    /// Shared dimensionality of the cached embeddings, if any were supplied
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn has_embeddings(&self) -> bool {
        !self.embeddings.is_empty()
    }
}

/// Collects schemas and identifier embeddings, then validates them into a
/// [`ToolRegistry`]
#[derive(Debug, Clone, Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<ToolSchema>,
    embeddings: HashMap<String, Embedding>,
}

impl ToolRegistryBuilder {
    pub fn register(mut self, tool: ToolSchema) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn register_all(mut self, tools: impl IntoIterator<Item = ToolSchema>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_embedding(mut self, identifier: impl Into<String>, embedding: Embedding) -> Self {
        self.embeddings.insert(identifier.into(), embedding);
        self
    }

    pub fn with_embeddings(
        mut self,
        embeddings: impl IntoIterator<Item = (String, Embedding)>,
    ) -> Self {
        self.embeddings.extend(embeddings);
        self
    }

    /// Every distinct identifier (tool names and parameter names), sorted
    pub fn identifiers(&self) -> BTreeSet<String> {
        self.tools
            .iter()
            .flat_map(|t| std::iter::once(t.name.clone()).chain(t.parameter_names().map(String::from)))
            .collect()
    }

    /// Identifiers that still need an embedding
    pub fn pending_identifiers(&self) -> Vec<String> {
        self.identifiers()
            .into_iter()
            .filter(|id| !self.embeddings.contains_key(id))
            .collect()
    }

    /// Validate and freeze the registry
    ///
    /// Fails on duplicate tool names, duplicate parameter names within a tool,
    /// empty names, mixed embedding dimensionalities, and partially embedded
    /// registries (either every identifier has an embedding or none does).
    pub fn build(self) -> Result<ToolRegistry, DomainError> {
        let mut tools = BTreeMap::new();
        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(DomainError::InvalidSchema(
                    "tool name cannot be empty".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for param in &tool.parameters {
                if param.name.trim().is_empty() {
                    return Err(DomainError::InvalidSchema(format!(
                        "parameter name cannot be empty in tool '{}'",
                        tool.name
                    )));
                }
                if !seen.insert(param.name.as_str()) {
                    return Err(DomainError::DuplicateParameter {
                        tool: tool.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
            }
            if tools.insert(tool.name.clone(), tool.clone()).is_some() {
                return Err(DomainError::DuplicateTool(tool.name.clone()));
            }
        }

        let dimensions = self.validate_embeddings()?;

        Ok(ToolRegistry {
            tools,
            embeddings: self.embeddings,
            dimensions,
        })
    }

    fn validate_embeddings(&self) -> Result<Option<usize>, DomainError> {
        if self.embeddings.is_empty() {
            return Ok(None);
        }

        if let Some(missing) = self.pending_identifiers().into_iter().next() {
            return Err(DomainError::MissingEmbedding(missing));
        }

        // sorted so the reported identifier is stable
        let mut entries: Vec<_> = self.embeddings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let expected = entries[0].1.len();
        for (identifier, embedding) in entries {
            if embedding.is_empty() || embedding.len() != expected {
                return Err(DomainError::EmbeddingDimensionMismatch {
                    identifier: identifier.clone(),
                    expected,
                    actual: embedding.len(),
                });
            }
        }
        Ok(Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, ToolParameter};

    fn create_script() -> ToolSchema {
        ToolSchema::new("create_script")
            .with_parameter(ToolParameter::required("path", ParamType::String))
            .with_parameter(ToolParameter::optional("args", ParamType::Array))
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ToolRegistry::builder()
            .register(create_script())
            .register(ToolSchema::new("read_file"))
            .build()
            .unwrap();

        assert!(registry.get("create_script").is_some());
        assert!(registry.contains("read_file"));
        assert!(registry.get("creat_script").is_none());
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["create_script", "read_file"]
        );
        assert!(!registry.has_embeddings());
        assert_eq!(registry.dimensions(), None);
    }

    #[test]
    fn test_duplicate_tool_rejected() {
        let err = ToolRegistry::builder()
            .register(ToolSchema::new("read_file"))
            .register(ToolSchema::new("read_file"))
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateTool("read_file".to_string()));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let tool = ToolSchema::new("write_file")
            .with_parameter(ToolParameter::required("path", ParamType::String))
            .with_parameter(ToolParameter::optional("path", ParamType::String));
        let err = ToolRegistry::builder().register(tool).build().unwrap_err();
        assert!(matches!(err, DomainError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ToolRegistry::builder()
            .register(ToolSchema::new("  "))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema(_)));
    }

    #[test]
    fn test_identifiers_are_distinct() {
        let builder = ToolRegistry::builder()
            .register(create_script())
            .register(
                ToolSchema::new("read_file")
                    .with_parameter(ToolParameter::required("path", ParamType::String)),
            );
        let ids: Vec<_> = builder.identifiers().into_iter().collect();
        assert_eq!(ids, vec!["args", "create_script", "path", "read_file"]);
    }

    #[test]
    fn test_embeddings_cached() {
        let registry = ToolRegistry::builder()
            .register(create_script())
            .with_embedding("create_script", vec![1.0, 0.0, 0.0])
            .with_embedding("path", vec![0.0, 1.0, 0.0])
            .with_embedding("args", vec![0.0, 0.0, 1.0])
            .build()
            .unwrap();

        assert_eq!(registry.dimensions(), Some(3));
        assert_eq!(registry.embedding("path"), Some(&[0.0, 1.0, 0.0][..]));
        assert!(registry.embedding("pathh").is_none());
    }

    #[test]
    fn test_partial_embeddings_rejected() {
        let builder = ToolRegistry::builder()
            .register(create_script())
            .with_embedding("create_script", vec![1.0, 0.0]);
        assert_eq!(builder.pending_identifiers(), vec!["args", "path"]);

        let err = builder.build().unwrap_err();
        assert_eq!(err, DomainError::MissingEmbedding("args".to_string()));
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let err = ToolRegistry::builder()
            .register(ToolSchema::new("a"))
            .register(ToolSchema::new("b"))
            .with_embedding("a", vec![1.0, 0.0])
            .with_embedding("b", vec![1.0, 0.0, 0.0])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::EmbeddingDimensionMismatch {
                identifier: "b".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }
}
