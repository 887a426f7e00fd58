//! Portfolio content: one authored bag per section
//!
//! Insertion order is preserved so reports and migrated content list
//! sections in the order the author (or template) declared them.

use crate::section::{SectionContent, SectionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Authored content of a portfolio, keyed by section id
///
/// A missing key means the section is not present; an empty bag means it is
/// present but unauthored. Both count as "no content" when analyzing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioContent(IndexMap<SectionId, SectionContent>);

impl PortfolioContent {
    /// Create empty content
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Get section bag
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SectionContent> {
        self.0.get(id)
    }

    /// Get section bag only if it has at least one field
    #[inline]
    #[must_use]
    pub fn authored(&self, id: &str) -> Option<&SectionContent> {
        self.get(id).filter(|content| !content.is_empty())
    }

    /// Check if section has authored content
    #[inline]
    #[must_use]
    pub fn has_authored(&self, id: &str) -> bool {
        self.authored(id).is_some()
    }

    /// Check if section key is present (authored or not)
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace a section, returning the previous bag
    #[inline]
    pub fn insert(
        &mut self,
        id: impl Into<SectionId>,
        content: SectionContent,
    ) -> Option<SectionContent> {
        self.0.insert(id.into(), content)
    }

    /// Remove a section, keeping the order of the others
    #[inline]
    pub fn remove(&mut self, id: &str) -> Option<SectionContent> {
        self.0.shift_remove(id)
    }

    /// Iterate over sections in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&SectionId, &SectionContent)> {
        self.0.iter()
    }

    /// Section ids in order
    #[inline]
    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.0.keys()
    }

    /// Ids of sections with authored content, in order
    #[must_use]
    pub fn authored_ids(&self) -> Vec<&SectionId> {
        self.0
            .iter()
            .filter(|(_, content)| !content.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no section is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SectionId, SectionContent)> for PortfolioContent {
    fn from_iter<I: IntoIterator<Item = (SectionId, SectionContent)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PortfolioContent {
    type Item = (SectionId, SectionContent);
    type IntoIter = indexmap::map::IntoIter<SectionId, SectionContent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PortfolioContent {
        serde_json::from_value(json!({
            "hero": {"name": "Ada"},
            "about": {},
            "projects": {"projects": []}
        }))
        .unwrap()
    }

    #[test]
    fn empty_bag_is_present_but_not_authored() {
        let content = sample();
        assert!(content.contains("about"));
        assert!(!content.has_authored("about"));
        assert!(content.has_authored("hero"));
        assert!(!content.has_authored("contact"));
    }

    #[test]
    fn authored_ids_keep_order() {
        let content = sample();
        let ids: Vec<&str> = content.authored_ids().into_iter().map(SectionId::as_str).collect();
        assert_eq!(ids, vec!["hero", "projects"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut content = sample();
        content.remove("about");
        let ids: Vec<&str> = content.section_ids().map(SectionId::as_str).collect();
        assert_eq!(ids, vec!["hero", "projects"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["hero"]["name"], json!("Ada"));
        assert_eq!(value["about"], json!({}));
    }
}
