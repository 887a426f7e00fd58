//! Template definitions
//!
//! A template names its sections either through an explicit schema or,
//! failing that, through the keys of its default content. Both forms are
//! equivalent for every consumer: always go through
//! [`TemplateDefinition::section_ids`].

use crate::content::PortfolioContent;
use crate::error::SchemaError;
use crate::section::{SectionContent, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One section declared by a template schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Section id
    pub id: SectionId,
    /// Whether migrating into this template needs source content for it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl SectionDescriptor {
    /// Optional section
    #[inline]
    #[must_use]
    pub fn optional(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            required: false,
        }
    }

    /// Required section
    #[inline]
    #[must_use]
    pub fn required(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            required: true,
        }
    }
}

/// Explicit list of sections a template renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSchema {
    /// Sections in render order
    pub sections: Vec<SectionDescriptor>,
}

impl TemplateSchema {
    /// Create schema from descriptors
    #[inline]
    #[must_use]
    pub fn new(sections: Vec<SectionDescriptor>) -> Self {
        Self { sections }
    }
}

/// A visual template: declared sections plus default values per section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    /// Template id
    pub id: String,
    /// Explicit section list; when absent the default content keys are used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TemplateSchema>,
    /// Default values rendered for sections without authored content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content: Option<PortfolioContent>,
}

impl TemplateDefinition {
    /// Create a template with neither schema nor defaults
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema: None,
            default_content: None,
        }
    }

    /// With explicit schema
    #[inline]
    #[must_use]
    pub fn with_schema(mut self, schema: TemplateSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// With default content
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, defaults: PortfolioContent) -> Self {
        self.default_content = Some(defaults);
        self
    }

    /// Resolve the template's section ids
    ///
    /// Uses `schema.sections` when a schema is present, otherwise the keys of
    /// `defaultContent` in insertion order.
    ///
    /// # Errors
    /// - `SchemaError::EmptyTemplateId` if the id is empty
    /// - `SchemaError::MissingSections` if there is no schema and no
    ///   non-empty default content
    /// - `SchemaError::EmptySectionId` / `SchemaError::DuplicateSection` for
    ///   a malformed schema
    pub fn section_ids(&self) -> Result<Vec<SectionId>, SchemaError> {
        if self.id.is_empty() {
            return Err(SchemaError::EmptyTemplateId);
        }

        let ids: Vec<SectionId> = match (&self.schema, &self.default_content) {
            (Some(schema), _) => schema.sections.iter().map(|s| s.id.clone()).collect(),
            (None, Some(defaults)) if !defaults.is_empty() => {
                defaults.section_ids().cloned().collect()
            }
            _ => return Err(SchemaError::missing_sections(&self.id)),
        };

        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if id.is_empty() {
                return Err(SchemaError::EmptySectionId {
                    template: self.id.clone(),
                });
            }
            if !seen.insert(id.as_str()) {
                return Err(SchemaError::duplicate_section(&self.id, id.as_str()));
            }
        }

        Ok(ids)
    }

    /// Check the definition is well-formed
    ///
    /// # Errors
    /// Same as [`Self::section_ids`]
    #[inline]
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.section_ids().map(|_| ())
    }

    /// Schema descriptors flagged `required` (none without a schema)
    pub fn required_sections(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.schema
            .iter()
            .flat_map(|schema| schema.sections.iter())
            .filter(|descriptor| descriptor.required)
    }

    /// Default bag for a section, if the template supplies one
    #[inline]
    #[must_use]
    pub fn defaults_for(&self, id: &str) -> Option<&SectionContent> {
        self.default_content.as_ref().and_then(|defaults| defaults.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(template: &TemplateDefinition) -> Vec<String> {
        template
            .section_ids()
            .unwrap()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    #[test]
    fn schema_sections_take_precedence() {
        let template: TemplateDefinition = serde_json::from_value(json!({
            "id": "minimal",
            "schema": {"sections": [{"id": "hero"}, {"id": "contact", "required": true}]},
            "defaultContent": {"hero": {}, "footer": {}}
        }))
        .unwrap();

        assert_eq!(ids(&template), vec!["hero", "contact"]);
        let required: Vec<&str> = template.required_sections().map(|d| d.id.as_str()).collect();
        assert_eq!(required, vec!["contact"]);
    }

    #[test]
    fn falls_back_to_default_content_keys() {
        let template: TemplateDefinition = serde_json::from_value(json!({
            "id": "classic",
            "defaultContent": {"header": {"name": "Your name"}, "work": {"projects": []}}
        }))
        .unwrap();

        assert_eq!(ids(&template), vec!["header", "work"]);
        assert_eq!(template.required_sections().count(), 0);
    }

    #[test]
    fn missing_schema_and_defaults_is_malformed() {
        let template = TemplateDefinition::new("broken");
        assert_eq!(
            template.section_ids().unwrap_err(),
            SchemaError::missing_sections("broken")
        );

        let empty_defaults = TemplateDefinition::new("broken").with_defaults(PortfolioContent::new());
        assert!(empty_defaults.validate().is_err());
    }

    #[test]
    fn empty_schema_is_valid_and_empty() {
        let template = TemplateDefinition::new("blank").with_schema(TemplateSchema::default());
        assert!(template.section_ids().unwrap().is_empty());
    }

    #[test]
    fn duplicate_section_rejected() {
        let template = TemplateDefinition::new("dup").with_schema(TemplateSchema::new(vec![
            SectionDescriptor::optional("hero"),
            SectionDescriptor::required("hero"),
        ]));
        assert_eq!(
            template.validate().unwrap_err(),
            SchemaError::duplicate_section("dup", "hero")
        );
    }

    #[test]
    fn empty_template_id_rejected() {
        let template = TemplateDefinition::new("").with_schema(TemplateSchema::default());
        assert_eq!(template.validate().unwrap_err(), SchemaError::EmptyTemplateId);
    }

    #[test]
    fn required_flag_omitted_when_false() {
        let value = serde_json::to_value(SectionDescriptor::optional("hero")).unwrap();
        assert_eq!(value, json!({"id": "hero"}));
    }
}
