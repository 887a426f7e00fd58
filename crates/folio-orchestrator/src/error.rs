//! Error types for the orchestrator
//!
//! Covers:
//! - Analysis and migration failures bubbling up from the pure layer
//! - Requests made stale by a newer request or by cancellation
//! - Timeouts and refused migrations
//! - Lifecycle and configuration problems

use crate::state::Phase;
use crate::types::{FailureReason, RequestId};
use folio_migration::{AnalysisError, MigrationError};

/// Main orchestrator error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestratorError {
    /// Analysis failed
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Migration failed
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),

    /// A newer request replaced this one
    #[error("request {request} superseded by a newer request")]
    Superseded {
        /// Stale request
        request: RequestId,
    },

    /// The request was cancelled
    #[error("request {request} cancelled")]
    Cancelled {
        /// Cancelled request
        request: RequestId,
    },

    /// Analysis did not finish in time
    #[error("analysis timed out after {duration_secs}s")]
    Timeout {
        /// Configured limit
        duration_secs: u64,
    },

    /// Migration refused because the analysis reported blocking issues
    #[error("templates are incompatible: {}", issues.join("; "))]
    Incompatible {
        /// Blocking issues from the analysis
        issues: Vec<String>,
    },

    /// Lifecycle transition not allowed
    #[error("illegal transition from {from:?} to {to:?}")]
    IllegalTransition {
        /// Current phase
        from: Phase,
        /// Requested phase
        to: Phase,
    },

    /// Template id not registered
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl OrchestratorError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if the request lost to a newer request or a cancel
    ///
    /// Stale outcomes are expected under rapid switching and should not be
    /// surfaced as errors.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Superseded { .. } | Self::Cancelled { .. })
    }

    /// Classification for [`MigrationFailure`](crate::MigrationFailure)
    #[must_use]
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Analysis(_) | Self::UnknownTemplate(_) => FailureReason::InvalidTemplate,
            Self::Migration(MigrationError::Template { .. }) => FailureReason::InvalidTemplate,
            Self::Migration(_) => FailureReason::Migration,
            Self::Superseded { .. } => FailureReason::Superseded,
            Self::Cancelled { .. } => FailureReason::Cancelled,
            Self::Timeout { .. } => FailureReason::Timeout,
            Self::Incompatible { .. } => FailureReason::Incompatible,
            Self::IllegalTransition { .. } | Self::Config(_) => FailureReason::Internal,
        }
    }

    /// Create unknown template error
    #[inline]
    #[must_use]
    pub fn unknown_template(id: impl Into<String>) -> Self {
        Self::UnknownTemplate(id.into())
    }
}
