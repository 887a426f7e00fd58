//! Core types for the orchestrator
//!
//! Defines:
//! - Orchestrator configuration
//! - Request identifiers
//! - The migration result handed back to the caller

use crate::error::OrchestratorError;
use folio_migration::{CompatibilityReport, MigrationNotes, ShapePolicy};
use folio_schema::PortfolioContent;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of one analyze/change request; later requests compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// How field shapes weigh into the analysis
    pub shape_policy: ShapePolicy,
    /// Refuse to migrate when the analysis reports blocking issues
    pub block_incompatible: bool,
    /// Upper bound on one analysis call, in seconds
    pub analysis_timeout_secs: u64,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With shape policy
    #[inline]
    #[must_use]
    pub fn with_shape_policy(mut self, policy: ShapePolicy) -> Self {
        self.shape_policy = policy;
        self
    }

    /// With incompatibility blocking
    #[inline]
    #[must_use]
    pub fn with_block_incompatible(mut self, block: bool) -> Self {
        self.block_incompatible = block;
        self
    }

    /// With analysis timeout
    #[inline]
    #[must_use]
    pub fn with_analysis_timeout_secs(mut self, secs: u64) -> Self {
        self.analysis_timeout_secs = secs;
        self
    }

    /// Analysis timeout as a duration
    #[inline]
    #[must_use]
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// Parse and validate configuration from TOML; missing keys take defaults
    ///
    /// # Errors
    /// `OrchestratorError::Config` if the document does not parse or a
    /// value is out of range
    pub fn from_toml_str(source: &str) -> Result<Self, OrchestratorError> {
        let config: Self =
            toml::from_str(source).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values are in range
    ///
    /// # Errors
    /// `OrchestratorError::Config` if the analysis timeout is zero
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.analysis_timeout_secs == 0 {
            return Err(OrchestratorError::Config(
                "analysis_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            shape_policy: ShapePolicy::BestEffort,
            block_incompatible: false,
            analysis_timeout_secs: 30,
        }
    }
}

/// Successful template switch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationSuccess {
    /// New content for the destination template; the caller commits it
    pub content: PortfolioContent,
    /// Analysis the migration was checked against
    pub analysis: CompatibilityReport,
    /// Human-readable summary
    pub message: String,
    /// What the migration did per section
    pub notes: MigrationNotes,
}

/// Why a template switch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A template definition was malformed
    InvalidTemplate,
    /// The migration transform failed
    Migration,
    /// Blocking issues and `block_incompatible` is set
    Incompatible,
    /// A newer request replaced this one
    Superseded,
    /// The caller abandoned the request
    Cancelled,
    /// The analysis took too long
    Timeout,
    /// Any other failure
    Internal,
}

/// Failed template switch; the caller's content is untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    /// Human-readable error
    pub error: String,
    /// Classification
    pub reason: FailureReason,
    /// Whether retrying the same inputs may succeed
    pub retryable: bool,
}

impl From<OrchestratorError> for MigrationFailure {
    fn from(err: OrchestratorError) -> Self {
        Self {
            reason: err.reason(),
            retryable: err.is_retryable(),
            error: err.to_string(),
        }
    }
}

/// Outcome of [`change_template`](crate::MigrationOrchestrator::change_template)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationResult {
    /// Content migrated
    Success(MigrationSuccess),
    /// Nothing applied
    Failure(MigrationFailure),
}

impl MigrationResult {
    /// Check if the migration succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Migrated content, if any
    #[inline]
    #[must_use]
    pub fn content(&self) -> Option<&PortfolioContent> {
        match self {
            Self::Success(success) => Some(&success.content),
            Self::Failure(_) => None,
        }
    }

    /// Error message, if failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(&failure.error),
        }
    }

    /// Failure details, if failed
    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<&MigrationFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Take the success, if any
    #[inline]
    #[must_use]
    pub fn into_success(self) -> Option<MigrationSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }
}
