//! Compatibility report
//!
//! The result of comparing two templates against a content snapshot: which
//! authored sections survive a template switch, which are lost, and whether
//! any destination requirement is unmet.

use folio_schema::SectionId;
use serde::{Deserialize, Serialize};

/// Outcome of a compatibility analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// `true` iff `issues` is empty
    pub compatible: bool,
    /// Blocking problems (required destination sections without a source)
    pub issues: Vec<String>,
    /// Non-blocking notices (sections that will be dropped or reshaped)
    pub warnings: Vec<String>,
    /// Authored sections with a same-named home in the destination
    pub mappable: Vec<SectionId>,
    /// Authored sections with a home whose shape does not match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partially_mappable: Vec<SectionId>,
    /// Authored sections with no home in the destination
    pub unmappable: Vec<SectionId>,
    /// Tallies
    pub summary: ReportSummary,
}

/// Section tallies of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Sections declared by the source template
    pub total_sections: usize,
    /// Length of `mappable`
    pub mappable_sections: usize,
    /// Length of `unmappable`
    pub unmappable_sections: usize,
    /// Required destination sections the source template lacks
    pub new_required_sections: usize,
    /// Length of `partially_mappable`
    #[serde(default, skip_serializing_if = "is_zero")]
    pub partially_mappable_sections: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// What happens to one authored section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionFate {
    /// Carried over under the same id
    Mappable,
    /// Carried over, but some fields have the wrong shape
    PartiallyMappable,
    /// Dropped
    Unmappable,
}

impl CompatibilityReport {
    /// Classification of an authored section (`None` if the section was not
    /// authored or is not declared by the source template)
    #[must_use]
    pub fn fate(&self, id: &str) -> Option<SectionFate> {
        let contains = |list: &[SectionId]| list.iter().any(|s| s.as_str() == id);

        if contains(&self.mappable) {
            Some(SectionFate::Mappable)
        } else if contains(&self.partially_mappable) {
            Some(SectionFate::PartiallyMappable)
        } else if contains(&self.unmappable) {
            Some(SectionFate::Unmappable)
        } else {
            None
        }
    }

    /// Check if the report carries anything the user should see
    #[inline]
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.issues.is_empty() || !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> CompatibilityReport {
        CompatibilityReport {
            compatible: true,
            issues: vec![],
            warnings: vec!["w".to_string()],
            mappable: vec![SectionId::new("hero")],
            partially_mappable: vec![],
            unmappable: vec![SectionId::new("projects")],
            summary: ReportSummary {
                total_sections: 3,
                mappable_sections: 1,
                unmappable_sections: 1,
                new_required_sections: 0,
                partially_mappable_sections: 0,
            },
        }
    }

    #[test]
    fn fate_lookup() {
        let report = report();
        assert_eq!(report.fate("hero"), Some(SectionFate::Mappable));
        assert_eq!(report.fate("projects"), Some(SectionFate::Unmappable));
        assert_eq!(report.fate("about"), None);
    }

    #[test]
    fn serializes_with_camel_case_summary() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(
            value["summary"],
            json!({
                "totalSections": 3,
                "mappableSections": 1,
                "unmappableSections": 1,
                "newRequiredSections": 0
            })
        );
        assert!(value.get("partiallyMappable").is_none());
    }

    #[test]
    fn has_findings() {
        assert!(report().has_findings());
        assert!(!CompatibilityReport::default().has_findings());
    }
}
