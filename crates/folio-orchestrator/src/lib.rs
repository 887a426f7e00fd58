//! Folio Migration Orchestrator
//!
//! Stateful entry point for switching a portfolio's template: preview the
//! consequences, confirm, migrate.
//!
//! # Core Concepts
//!
//! - [`MigrationOrchestrator`]: per-session coordinator; caches the latest
//!   [`CompatibilityReport`](folio_migration::CompatibilityReport) and
//!   single-flights requests (last request wins)
//! - [`AnalysisBackend`]: where reports come from; [`LocalAnalysis`] runs the
//!   analyzer in-process
//! - [`MigrationResult`]: success with new content, or a failure that leaves
//!   the caller's content untouched
//! - [`Phase`]: lifecycle, validated on every transition
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_orchestrator::{MigrationConfig, MigrationOrchestrator, MigrationResult};
//!
//! let orchestrator = MigrationOrchestrator::new(MigrationConfig::default());
//! if let Some(report) = orchestrator.analyze_change(&current, &next, &content).await {
//!     show_preview(&report);
//! }
//! match orchestrator.change_template(&current, &next, &content).await {
//!     MigrationResult::Success(done) => store.commit(done.content),
//!     MigrationResult::Failure(failure) => show_error(&failure.error),
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod backend;
mod cancel;
mod error;
mod orchestrator;
mod state;
mod types;

// Re-exports
pub use backend::{AnalysisBackend, LocalAnalysis};
pub use cancel::CancellationToken;
pub use error::OrchestratorError;
pub use orchestrator::MigrationOrchestrator;
pub use state::{allowed_transitions, validate_transition, OrchestratorSnapshot, Phase};
pub use types::{
    FailureReason, MigrationConfig, MigrationFailure, MigrationResult, MigrationSuccess,
    RequestId,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
