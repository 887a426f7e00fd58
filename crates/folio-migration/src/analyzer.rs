//! Compatibility analyzer
//!
//! Compares a source and a destination template against a content snapshot
//! and reports, per authored section, whether it survives the switch.

use crate::error::AnalysisError;
use crate::report::{CompatibilityReport, ReportSummary};
use folio_schema::{ExpectedShape, PortfolioContent, SectionId, TemplateDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How section shapes weigh into the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    /// Sections are matched on id alone. A mappable section may still carry
    /// fields the destination renders differently; the migration keeps them
    /// as authored.
    #[default]
    BestEffort,

    /// Sections whose authored fields contradict the destination's expected
    /// shape are reported as partially mappable, with a warning.
    Downgrade,
}

/// Pure, deterministic template compatibility check
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityAnalyzer {
    policy: ShapePolicy,
}

impl CompatibilityAnalyzer {
    /// Create analyzer with shape policy
    #[inline]
    #[must_use]
    pub fn new(policy: ShapePolicy) -> Self {
        Self { policy }
    }

    /// Active shape policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> ShapePolicy {
        self.policy
    }

    /// Analyze switching `content` from template `from` to template `to`
    ///
    /// # Errors
    /// - `AnalysisError::MalformedTemplate` if either definition names no
    ///   sections or declares a section twice
    pub fn analyze(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, AnalysisError> {
        let from_ids = from
            .section_ids()
            .map_err(|source| AnalysisError::malformed(&from.id, source))?;
        let to_ids = to
            .section_ids()
            .map_err(|source| AnalysisError::malformed(&to.id, source))?;

        let to_set: HashSet<&str> = to_ids.iter().map(SectionId::as_str).collect();

        let mut report = CompatibilityReport::default();

        for id in &from_ids {
            let Some(section) = content.authored(id.as_str()) else {
                continue;
            };

            if !to_set.contains(id.as_str()) {
                tracing::debug!(section = %id, "section has no home in destination");
                report.warnings.push(format!(
                    "Section \"{id}\" exists in current template but not in new template"
                ));
                report.unmappable.push(id.clone());
                continue;
            }

            if self.policy == ShapePolicy::Downgrade {
                let expected = ExpectedShape::for_section(&id.kind(), to.defaults_for(id.as_str()));
                let mismatches = expected.mismatches(section);
                if !mismatches.is_empty() {
                    let fields: Vec<String> = mismatches.iter().map(ToString::to_string).collect();
                    tracing::debug!(section = %id, fields = ?fields, "section shape mismatch");
                    report.warnings.push(format!(
                        "Section \"{id}\" will migrate with mismatched fields: {}",
                        fields.join(", ")
                    ));
                    report.partially_mappable.push(id.clone());
                    continue;
                }
            }

            report.mappable.push(id.clone());
        }

        let from_set: HashSet<&str> = from_ids.iter().map(SectionId::as_str).collect();
        for required in to.required_sections() {
            if !from_set.contains(required.id.as_str()) {
                report.issues.push(format!(
                    "New template requires \"{}\" section which doesn't exist in current template",
                    required.id
                ));
            }
        }

        report.compatible = report.issues.is_empty();
        report.summary = ReportSummary {
            total_sections: from_ids.len(),
            mappable_sections: report.mappable.len(),
            unmappable_sections: report.unmappable.len(),
            new_required_sections: report.issues.len(),
            partially_mappable_sections: report.partially_mappable.len(),
        };

        tracing::debug!(
            from = %from.id,
            to = %to.id,
            compatible = report.compatible,
            mappable = report.summary.mappable_sections,
            unmappable = report.summary.unmappable_sections,
            "compatibility analyzed"
        );

        Ok(report)
    }
}

/// Analyze with the default (best-effort) shape policy
///
/// # Errors
/// See [`CompatibilityAnalyzer::analyze`]
#[inline]
pub fn analyze(
    from: &TemplateDefinition,
    to: &TemplateDefinition,
    content: &PortfolioContent,
) -> Result<CompatibilityReport, AnalysisError> {
    CompatibilityAnalyzer::default().analyze(from, to, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SectionFate;
    use folio_schema::{SchemaError, SectionDescriptor, TemplateSchema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template(id: &str, sections: Vec<SectionDescriptor>) -> TemplateDefinition {
        TemplateDefinition::new(id).with_schema(TemplateSchema::new(sections))
    }

    fn content(value: serde_json::Value) -> PortfolioContent {
        serde_json::from_value(value).unwrap()
    }

    fn ids(list: &[SectionId]) -> Vec<&str> {
        list.iter().map(SectionId::as_str).collect()
    }

    #[test]
    fn same_template_is_fully_mappable() {
        let t = template(
            "atlas",
            vec![SectionDescriptor::optional("hero"), SectionDescriptor::required("contact")],
        );
        let c = content(json!({"hero": {"name": "A"}, "contact": {"email": "a@b.c"}}));

        let report = analyze(&t, &t, &c).unwrap();
        assert!(report.compatible);
        assert_eq!(ids(&report.mappable), vec!["hero", "contact"]);
        assert!(report.unmappable.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn content_outside_source_schema_is_ignored() {
        let from = template("atlas", vec![SectionDescriptor::optional("hero")]);
        let to = template("studio", vec![SectionDescriptor::optional("hero")]);
        let c = content(json!({"hero": {"name": "A"}, "orphan": {"x": 1}}));

        let report = analyze(&from, &to, &c).unwrap();
        assert_eq!(ids(&report.mappable), vec!["hero"]);
        assert!(report.fate("orphan").is_none());
        assert_eq!(report.summary.total_sections, 1);
    }

    #[test]
    fn required_section_present_in_source_is_not_an_issue() {
        let from = template("atlas", vec![SectionDescriptor::optional("contact")]);
        let to = template("studio", vec![SectionDescriptor::required("contact")]);

        let report = analyze(&from, &to, &PortfolioContent::new()).unwrap();
        assert!(report.compatible);
        assert_eq!(report.summary.new_required_sections, 0);
    }

    #[test]
    fn defaults_keys_stand_in_for_schema() {
        let from: TemplateDefinition = serde_json::from_value(json!({
            "id": "classic",
            "defaultContent": {"header": {}, "work": {}}
        }))
        .unwrap();
        let to = template("studio", vec![SectionDescriptor::optional("work")]);
        let c = content(json!({"header": {"name": "A"}, "work": {"projects": []}}));

        let report = analyze(&from, &to, &c).unwrap();
        assert_eq!(ids(&report.mappable), vec!["work"]);
        assert_eq!(ids(&report.unmappable), vec!["header"]);
        assert_eq!(
            report.warnings,
            vec!["Section \"header\" exists in current template but not in new template"]
        );
    }

    #[test]
    fn malformed_template_is_an_error() {
        let from = TemplateDefinition::new("broken");
        let to = template("studio", vec![SectionDescriptor::optional("hero")]);

        let err = analyze(&from, &to, &PortfolioContent::new()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::malformed("broken", SchemaError::missing_sections("broken"))
        );
    }

    #[test]
    fn best_effort_ignores_shapes() {
        let t = template("atlas", vec![SectionDescriptor::optional("projects")]);
        let c = content(json!({"projects": {"projects": {"featured": 1}}}));

        let report = analyze(&t, &t, &c).unwrap();
        assert_eq!(report.fate("projects"), Some(SectionFate::Mappable));
        assert!(report.partially_mappable.is_empty());
    }

    #[test]
    fn downgrade_reports_partially_mappable() {
        let t = template("atlas", vec![SectionDescriptor::optional("projects")]);
        let c = content(json!({"projects": {"projects": {"featured": 1}}}));

        let report = CompatibilityAnalyzer::new(ShapePolicy::Downgrade)
            .analyze(&t, &t, &c)
            .unwrap();

        assert!(report.compatible);
        assert!(report.mappable.is_empty());
        assert_eq!(ids(&report.partially_mappable), vec!["projects"]);
        assert_eq!(report.summary.partially_mappable_sections, 1);
        assert_eq!(
            report.warnings,
            vec![
                "Section \"projects\" will migrate with mismatched fields: projects (expected list, found record)"
            ]
        );
    }

    #[test]
    fn downgrade_uses_destination_defaults() {
        let from = template("atlas", vec![SectionDescriptor::optional("contact")]);
        let to: TemplateDefinition = serde_json::from_value(json!({
            "id": "studio",
            "defaultContent": {"contact": {"email": ["primary@example.com"]}}
        }))
        .unwrap();
        let c = content(json!({"contact": {"email": "me@example.com"}}));

        let report = CompatibilityAnalyzer::new(ShapePolicy::Downgrade)
            .analyze(&from, &to, &c)
            .unwrap();
        assert_eq!(report.fate("contact"), Some(SectionFate::PartiallyMappable));
    }
}
