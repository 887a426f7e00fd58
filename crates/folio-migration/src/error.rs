//! Error types for analysis and migration
//!
//! Both the analyzer and the migrator only fail on structurally invalid
//! template definitions. Incompatibility between two valid templates is
//! reported as data in the [`CompatibilityReport`](crate::CompatibilityReport).

use folio_schema::SchemaError;

/// Analysis could not run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A template definition is malformed
    #[error("malformed template \"{template}\": {source}")]
    MalformedTemplate {
        /// Offending template id
        template: String,
        /// Underlying schema error
        #[source]
        source: SchemaError,
    },
}

impl AnalysisError {
    /// Create malformed template error
    #[inline]
    #[must_use]
    pub fn malformed(template: impl Into<String>, source: SchemaError) -> Self {
        Self::MalformedTemplate {
            template: template.into(),
            source,
        }
    }
}

/// Migration transform could not run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Destination template supplies no default content
    #[error("template \"{template}\" has no default content to migrate into")]
    MissingDefaultContent {
        /// Destination template id
        template: String,
    },

    /// A template definition is malformed
    #[error("malformed template \"{template}\": {source}")]
    Template {
        /// Offending template id
        template: String,
        /// Underlying schema error
        #[source]
        source: SchemaError,
    },
}

impl MigrationError {
    /// Create malformed template error
    #[inline]
    #[must_use]
    pub fn template(template: impl Into<String>, source: SchemaError) -> Self {
        Self::Template {
            template: template.into(),
            source,
        }
    }
}
