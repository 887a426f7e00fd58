//! Content migrator
//!
//! Builds the content of a portfolio under a new template:
//!
//! 1. Baseline: the destination's defaults, one entry per destination section
//! 2. Direct pass: authored sections with a same-named destination section are
//!    merged over its defaults (shallow, per field)
//! 3. Alias pass: destination sections still without authored content may be
//!    filled from a synonym section through the [`AliasTable`]
//!
//! Inputs are only read; the result is always a fresh value.

use crate::alias::AliasTable;
use crate::error::MigrationError;
use folio_schema::{
    ExpectedShape, PortfolioContent, SectionContent, SectionId, ShapeMismatch, TemplateDefinition,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An alias rule that fired during a migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedAlias {
    /// Rule name
    pub rule: String,
    /// Source section the content came from
    pub source: SectionId,
    /// Destination section it landed in
    pub target: SectionId,
}

/// Migrated section whose fields contradict the destination's expected shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionShapeMismatch {
    /// Destination section
    pub section: SectionId,
    /// Offending fields
    pub fields: Vec<ShapeMismatch>,
}

/// What a migration did beyond the content itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationNotes {
    /// Sections carried over under the same id
    pub direct: Vec<SectionId>,
    /// Alias rules that fired
    pub aliases_applied: Vec<AppliedAlias>,
    /// Authored sections that found no home
    pub dropped_sections: Vec<SectionId>,
    /// Migrated sections kept as authored despite a shape mismatch
    pub shape_mismatches: Vec<SectionShapeMismatch>,
}

impl MigrationNotes {
    /// Check if any authored content was lost
    #[inline]
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.dropped_sections.is_empty()
    }
}

/// Migrated content with its notes
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedContent {
    /// Content valid under the destination template
    pub content: PortfolioContent,
    /// What the migration did
    pub notes: MigrationNotes,
}

/// Pure content transform between templates
#[derive(Debug, Clone)]
pub struct ContentMigrator {
    aliases: AliasTable,
}

impl Default for ContentMigrator {
    fn default() -> Self {
        Self::new(AliasTable::standard())
    }
}

impl ContentMigrator {
    /// Create migrator with alias table
    #[inline]
    #[must_use]
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Alias table in use
    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Migrate `content` from template `from` to template `to`
    ///
    /// # Errors
    /// - `MigrationError::Template` if either definition is malformed
    /// - `MigrationError::MissingDefaultContent` if `to` has no defaults
    pub fn migrate(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<PortfolioContent, MigrationError> {
        self.migrate_with_notes(from, to, content)
            .map(|migrated| migrated.content)
    }

    /// Migrate and report what happened to each authored section
    ///
    /// # Errors
    /// Same as [`Self::migrate`]
    pub fn migrate_with_notes(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<MigratedContent, MigrationError> {
        from.section_ids()
            .map_err(|source| MigrationError::template(&from.id, source))?;
        let to_ids = to
            .section_ids()
            .map_err(|source| MigrationError::template(&to.id, source))?;
        let defaults = to
            .default_content
            .as_ref()
            .ok_or_else(|| MigrationError::MissingDefaultContent {
                template: to.id.clone(),
            })?;

        let to_set: HashSet<&str> = to_ids.iter().map(SectionId::as_str).collect();
        let default_for = |id: &str| defaults.get(id).cloned().unwrap_or_default();

        let mut result: PortfolioContent = to_ids
            .iter()
            .map(|id| (id.clone(), default_for(id.as_str())))
            .collect();
        let mut notes = MigrationNotes::default();
        let mut filled: HashSet<SectionId> = HashSet::new();
        let mut consumed: HashSet<&SectionId> = HashSet::new();

        for (id, section) in content.iter() {
            if !to_set.contains(id.as_str()) {
                continue;
            }
            let merged = SectionContent::merged(&default_for(id.as_str()), section);
            result.insert(id.clone(), merged);

            if !section.is_empty() {
                tracing::debug!(section = %id, "section carried over");
                filled.insert(id.clone());
                notes.direct.push(id.clone());
            }
        }

        for rule in self.aliases.iter() {
            let target = &rule.target_id;

            // Only a destination section left without authored content may be
            // filled by a synonym, and only from a section with no home of its own.
            if !to_set.contains(target.as_str()) || filled.contains(target) {
                continue;
            }
            let Some((source_id, source)) = rule.source_in(content) else {
                continue;
            };
            if to_set.contains(source_id.as_str()) {
                continue;
            }

            tracing::debug!(rule = %rule.name, source = %source_id, target = %target, "alias applied");
            result.insert(target.clone(), rule.apply(&default_for(target.as_str()), source));
            filled.insert(target.clone());
            consumed.insert(source_id);
            notes.aliases_applied.push(AppliedAlias {
                rule: rule.name.clone(),
                source: source_id.clone(),
                target: target.clone(),
            });
        }

        for id in content.authored_ids() {
            if !to_set.contains(id.as_str()) && !consumed.contains(id) {
                tracing::debug!(section = %id, "section dropped");
                notes.dropped_sections.push(id.clone());
            }
        }

        for (id, section) in result.iter() {
            if !filled.contains(id) {
                continue;
            }
            let expected = ExpectedShape::for_section(&id.kind(), defaults.get(id.as_str()));
            let fields = expected.mismatches(section);
            if !fields.is_empty() {
                tracing::warn!(
                    section = %id,
                    fields = ?fields.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "migrated section does not match the destination shape"
                );
                notes.shape_mismatches.push(SectionShapeMismatch {
                    section: id.clone(),
                    fields,
                });
            }
        }

        tracing::info!(
            from = %from.id,
            to = %to.id,
            direct = notes.direct.len(),
            aliased = notes.aliases_applied.len(),
            dropped = notes.dropped_sections.len(),
            "content migrated"
        );

        Ok(MigratedContent {
            content: result,
            notes,
        })
    }
}

/// Migrate with the standard alias table
///
/// # Errors
/// See [`ContentMigrator::migrate`]
#[inline]
pub fn migrate(
    from: &TemplateDefinition,
    to: &TemplateDefinition,
    content: &PortfolioContent,
) -> Result<PortfolioContent, MigrationError> {
    ContentMigrator::default().migrate(from, to, content)
}
