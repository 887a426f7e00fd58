//! Section alias rules
//!
//! Template families name semantically equivalent sections differently
//! (`hero` vs `header`, `projects` vs `work`). An [`AliasRule`] carries
//! authored content across such a rename when the destination has no direct
//! match. Rules are plain data evaluated in table order, so the set can be
//! tested and extended without touching the migrator.

use folio_schema::{PortfolioContent, SectionContent, SectionId};
use serde_json::Value;

/// Pulls the part of a source section an alias carries over
pub type ExtractFn = fn(&SectionContent) -> SectionContent;

/// Combines the destination's defaults with the extracted content
pub type MergeFn = fn(&SectionContent, &SectionContent) -> SectionContent;

/// Carry the whole source bag
#[must_use]
pub fn extract_whole(source: &SectionContent) -> SectionContent {
    source.clone()
}

/// Carry the project records: the nested `projects` field when present,
/// otherwise the whole bag, placed under `projects`
#[must_use]
pub fn extract_project_list(source: &SectionContent) -> SectionContent {
    let projects = source
        .get("projects")
        .filter(|value| !value.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(source.as_map().clone()));

    SectionContent::with_field("projects", projects)
}

/// Shallow merge of extracted fields over defaults
#[must_use]
pub fn merge_shallow(defaults: &SectionContent, extracted: &SectionContent) -> SectionContent {
    SectionContent::merged(defaults, extracted)
}

/// One alias: sections that may stand in for a destination section
#[derive(Debug, Clone)]
pub struct AliasRule {
    /// Rule name (for notes and logs)
    pub name: String,
    /// Candidate source ids, in priority order
    pub source_ids: Vec<SectionId>,
    /// Destination section filled by this rule
    pub target_id: SectionId,
    /// Part of the source carried over
    pub extract: ExtractFn,
    /// How extracted content combines with the destination's defaults
    pub merge: MergeFn,
}

impl AliasRule {
    /// Create rule
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source_ids: Vec<SectionId>,
        target_id: impl Into<SectionId>,
        extract: ExtractFn,
        merge: MergeFn,
    ) -> Self {
        Self {
            name: name.into(),
            source_ids,
            target_id: target_id.into(),
            extract,
            merge,
        }
    }

    /// Rule copying an entire section under a new id
    #[must_use]
    pub fn whole_section(source: &str, target: &str) -> Self {
        Self::new(
            format!("{source}->{target}"),
            vec![SectionId::new(source)],
            target,
            extract_whole,
            merge_shallow,
        )
    }

    /// Rule copying a project list into the target's `projects` field
    #[must_use]
    pub fn project_list(source: &str, target: &str) -> Self {
        Self::new(
            format!("{source}->{target}"),
            vec![SectionId::new(source)],
            target,
            extract_project_list,
            merge_shallow,
        )
    }

    /// First source id with authored content
    #[must_use]
    pub fn source_in<'a>(
        &'a self,
        content: &'a PortfolioContent,
    ) -> Option<(&'a SectionId, &'a SectionContent)> {
        self.source_ids
            .iter()
            .find_map(|id| content.authored(id.as_str()).map(|section| (id, section)))
    }

    /// Produce the target section from a source section and the target's defaults
    #[inline]
    #[must_use]
    pub fn apply(&self, defaults: &SectionContent, source: &SectionContent) -> SectionContent {
        (self.merge)(defaults, &(self.extract)(source))
    }
}

/// Ordered set of alias rules
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    rules: Vec<AliasRule>,
}

impl AliasTable {
    /// Create empty table (no aliasing)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in synonyms observed across template families
    ///
    /// - `hero` <-> `header`: whole section
    /// - `projects` <-> `work`: project list
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_rule(AliasRule::whole_section("hero", "header"))
            .with_rule(AliasRule::whole_section("header", "hero"))
            .with_rule(AliasRule::project_list("projects", "work"))
            .with_rule(AliasRule::project_list("work", "projects"))
    }

    /// Append rule
    #[inline]
    #[must_use]
    pub fn with_rule(mut self, rule: AliasRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append rule in place
    #[inline]
    pub fn push(&mut self, rule: AliasRule) {
        self.rules.push(rule);
    }

    /// Iterate rules in evaluation order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &AliasRule> {
        self.rules.iter()
    }

    /// Rule names in evaluation order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// Number of rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
