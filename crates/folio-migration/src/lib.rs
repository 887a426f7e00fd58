//! Folio Template Migration
//!
//! Pure functions that decide what survives a template switch and produce
//! the migrated content.
//!
//! # Core Concepts
//!
//! - [`CompatibilityAnalyzer`]: compares two templates against a content
//!   snapshot and produces a [`CompatibilityReport`]
//! - [`ContentMigrator`]: builds content for the destination template from
//!   defaults, direct matches and alias rules
//! - [`AliasTable`]: ordered, declarative synonym rules (`hero` <-> `header`,
//!   `projects` <-> `work`)
//! - [`ShapePolicy`]: whether field shapes downgrade a section's mappability
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_migration::{analyze, migrate};
//!
//! let report = analyze(&current, &next, &content)?;
//! for warning in &report.warnings {
//!     println!("{warning}");
//! }
//! if report.compatible {
//!     let migrated = migrate(&current, &next, &content)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod alias;
mod analyzer;
mod error;
mod migrator;
mod report;

// Re-exports
pub use alias::{
    extract_project_list, extract_whole, merge_shallow, AliasRule, AliasTable, ExtractFn, MergeFn,
};
pub use analyzer::{analyze, CompatibilityAnalyzer, ShapePolicy};
pub use error::{AnalysisError, MigrationError};
pub use migrator::{
    migrate, AppliedAlias, ContentMigrator, MigratedContent, MigrationNotes, SectionShapeMismatch,
};
pub use report::{CompatibilityReport, ReportSummary, SectionFate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
