//! Error types for the content model
//!
//! Raised only for structurally invalid inputs: a template that names no
//! sections, a duplicate section declaration, or a section bag that is not a
//! JSON object. Expected incompatibilities between templates are never errors.

/// Errors raised while reading template definitions or section content
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Template id is empty
    #[error("template id must not be empty")]
    EmptyTemplateId,

    /// Neither `schema.sections` nor a non-empty `defaultContent` was supplied
    #[error("template \"{template}\" declares no schema and no default content")]
    MissingSections {
        /// Offending template id
        template: String,
    },

    /// A section descriptor has an empty id
    #[error("template \"{template}\" declares a section with an empty id")]
    EmptySectionId {
        /// Offending template id
        template: String,
    },

    /// The same section id is declared twice in one schema
    #[error("template \"{template}\" declares section \"{section}\" more than once")]
    DuplicateSection {
        /// Offending template id
        template: String,
        /// Repeated section id
        section: String,
    },

    /// Section content must be a JSON object
    #[error("section content must be an object, found {found}")]
    NotAnObject {
        /// JSON kind actually found
        found: &'static str,
    },
}

impl SchemaError {
    /// Create missing sections error
    #[inline]
    #[must_use]
    pub fn missing_sections(template: impl Into<String>) -> Self {
        Self::MissingSections {
            template: template.into(),
        }
    }

    /// Create duplicate section error
    #[inline]
    #[must_use]
    pub fn duplicate_section(template: impl Into<String>, section: impl Into<String>) -> Self {
        Self::DuplicateSection {
            template: template.into(),
            section: section.into(),
        }
    }
}
