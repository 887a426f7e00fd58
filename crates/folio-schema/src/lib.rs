//! Folio Content Model
//!
//! Typed view over loosely structured portfolio content.
//!
//! # Core Concepts
//!
//! - [`TemplateDefinition`]: a visual template, its sections and their defaults
//! - [`SectionContent`]: open key/value bag authored for one section
//! - [`SectionKind`]: known section kinds with declared field shapes, plus an
//!   opaque custom kind
//! - [`PortfolioContent`]: ordered map of section id to authored bag
//! - [`TemplateRegistry`]: in-memory lookup of definitions by id
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_schema::{TemplateDefinition, PortfolioContent};
//!
//! let template: TemplateDefinition = serde_json::from_str(definition_json)?;
//! for id in template.section_ids()? {
//!     println!("{id}: {:?}", template.defaults_for(id.as_str()));
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod content;
mod error;
mod registry;
mod section;
mod template;

// Re-exports
pub use content::PortfolioContent;
pub use error::SchemaError;
pub use registry::TemplateRegistry;
pub use section::{
    ExpectedShape, FieldShape, SectionContent, SectionId, SectionKind, ShapeMismatch,
};
pub use template::{SectionDescriptor, TemplateDefinition, TemplateSchema};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
