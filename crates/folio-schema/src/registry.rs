//! In-memory template registry
//!
//! Provides [`TemplateRegistry`] for resolving template definitions by id.
//! Definitions are validated on registration and shared immutably afterwards.

use crate::error::SchemaError;
use crate::template::TemplateDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of loaded template definitions
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<TemplateDefinition>>,
}

impl TemplateRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Register a definition, replacing any previous one with the same id
    ///
    /// # Errors
    /// Returns the validation error if the definition is malformed; the
    /// registry is left unchanged.
    pub fn register(
        &mut self,
        template: TemplateDefinition,
    ) -> Result<Option<Arc<TemplateDefinition>>, SchemaError> {
        template.validate()?;
        Ok(self.templates.insert(template.id.clone(), Arc::new(template)))
    }

    /// Get definition by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<TemplateDefinition>> {
        self.templates.get(id).cloned()
    }

    /// Check if a definition is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Remove definition
    #[inline]
    pub fn remove(&mut self, id: &str) -> Option<Arc<TemplateDefinition>> {
        self.templates.remove(id)
    }

    /// Registered template ids, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered templates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{SectionDescriptor, TemplateSchema};

    fn template(id: &str) -> TemplateDefinition {
        TemplateDefinition::new(id)
            .with_schema(TemplateSchema::new(vec![SectionDescriptor::optional("hero")]))
    }

    #[test]
    fn registry_new_empty() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_register_and_get() {
        let mut registry = TemplateRegistry::new();
        let previous = registry.register(template("minimal")).unwrap();

        assert!(previous.is_none());
        assert!(registry.contains("minimal"));
        assert_eq!(registry.get("minimal").unwrap().id, "minimal");
    }

    #[test]
    fn registry_replaces_same_id() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("minimal")).unwrap();
        let previous = registry.register(template("minimal")).unwrap();

        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_rejects_malformed() {
        let mut registry = TemplateRegistry::new();
        let result = registry.register(TemplateDefinition::new("broken"));

        assert!(matches!(result, Err(SchemaError::MissingSections { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_ids_sorted() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("studio")).unwrap();
        registry.register(template("atlas")).unwrap();

        assert_eq!(registry.ids(), vec!["atlas", "studio"]);
    }

    #[test]
    fn registry_remove() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("atlas")).unwrap();

        assert!(registry.remove("atlas").is_some());
        assert!(!registry.contains("atlas"));
    }
}
