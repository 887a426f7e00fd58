//! Testing utilities for the Folio workspace
//!
//! Shared template fixtures, content builders and the reference migration
//! scenarios.

#![allow(missing_docs)]

use folio_schema::{
    PortfolioContent, SectionContent, SectionDescriptor, SectionId, TemplateDefinition,
    TemplateSchema,
};
use serde_json::{json, Value};

/// Source template, destination template and authored content
#[derive(Debug, Clone)]
pub struct Scenario {
    pub from: TemplateDefinition,
    pub to: TemplateDefinition,
    pub content: PortfolioContent,
}

/// Default bag a template of this test suite ships for a section
pub fn section_defaults(id: &str) -> SectionContent {
    let value = match id {
        "hero" | "header" => json!({
            "name": "Your Name",
            "title": "Your Title",
            "description": "A short introduction",
            "image": ""
        }),
        "about" => json!({"description": "Tell your story"}),
        "projects" | "work" => json!({"heading": "Selected work", "projects": []}),
        "skills" => json!({"skills": []}),
        "testimonials" => json!({"testimonials": []}),
        "contact" => json!({"email": "hello@example.com"}),
        _ => json!({}),
    };
    bag(value)
}

/// Template with a schema and defaults for every section
///
/// Each entry is `(section id, required)`.
pub fn template(id: &str, sections: &[(&str, bool)]) -> TemplateDefinition {
    let schema = TemplateSchema::new(
        sections
            .iter()
            .map(|(section, required)| SectionDescriptor {
                id: SectionId::new(*section),
                required: *required,
            })
            .collect(),
    );
    let defaults = sections
        .iter()
        .map(|(section, _)| (SectionId::new(*section), section_defaults(section)))
        .collect();

    TemplateDefinition::new(id)
        .with_schema(schema)
        .with_defaults(defaults)
}

/// Template without schema: sections come from the default content keys
pub fn schemaless_template(id: &str, sections: &[&str]) -> TemplateDefinition {
    let defaults = sections
        .iter()
        .map(|section| (SectionId::new(*section), section_defaults(section)))
        .collect();

    TemplateDefinition::new(id).with_defaults(defaults)
}

/// Section bag from a JSON object literal
pub fn bag(value: Value) -> SectionContent {
    SectionContent::try_from(value).expect("section fixture must be a JSON object")
}

/// Portfolio content from a JSON object literal
pub fn content(value: Value) -> PortfolioContent {
    serde_json::from_value(value).expect("content fixture must map section ids to objects")
}

/// Partial overlap with a new required section
pub fn scenario_overlap() -> Scenario {
    Scenario {
        from: template("atlas", &[("hero", false), ("about", false), ("projects", false)]),
        to: template(
            "studio",
            &[("hero", false), ("about", false), ("work", false), ("contact", true)],
        ),
        content: content(json!({
            "hero": {"name": "A"},
            "about": {},
            "projects": {"items": [1, 2]}
        })),
    }
}

/// `hero` only into `header` only
pub fn scenario_hero_to_header() -> Scenario {
    Scenario {
        from: template("atlas", &[("hero", false)]),
        to: template("classic", &[("header", false)]),
        content: content(json!({"hero": {"name": "Ada", "title": "Engineer"}})),
    }
}

/// No shared sections and nothing required
pub fn scenario_no_overlap() -> Scenario {
    Scenario {
        from: template("quotes", &[("testimonials", false)]),
        to: template("skills-grid", &[("skills", false)]),
        content: content(json!({
            "testimonials": {"items": [{"quote": "Great"}, {"quote": "Fast"}]}
        })),
    }
}

/// Install a test subscriber honoring `RUST_LOG` (idempotent)
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
