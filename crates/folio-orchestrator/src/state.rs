//! Orchestrator lifecycle
//!
//! ```text
//! Idle -> Analyzing -> Analyzed -> Migrating -> Done
//!             |            |           |
//!             +-------> Failed <-------+
//! ```
//!
//! A new request may start from any phase (last request wins), and any
//! phase may return to `Idle` on reset or cancel.

use crate::error::OrchestratorError;
use crate::types::RequestId;
use folio_migration::CompatibilityReport;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing in flight, no cached report
    #[default]
    Idle,
    /// Analysis in flight
    Analyzing,
    /// Report cached for the latest request
    Analyzed,
    /// Migration transform running
    Migrating,
    /// Latest migration succeeded
    Done,
    /// Latest request failed
    Failed,
}

impl Phase {
    /// Check if a request is in flight
    #[inline]
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Analyzing | Self::Migrating)
    }
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: Phase) -> &'static [Phase] {
    use Phase::{Analyzed, Analyzing, Done, Failed, Idle, Migrating};
    match from {
        Idle => &[Analyzing],
        Analyzing => &[Analyzing, Analyzed, Failed, Idle],
        Analyzed => &[Analyzing, Migrating, Failed, Idle],
        Migrating => &[Analyzing, Done, Failed, Idle],
        Done | Failed => &[Analyzing, Idle],
    }
}

/// Validate a phase transition
///
/// # Errors
/// `OrchestratorError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), OrchestratorError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(OrchestratorError::IllegalTransition { from, to })
    }
}

/// Point-in-time view of the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrchestratorSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Latest request, if one is current
    pub request: Option<RequestId>,
    /// Report of the latest successful analysis
    pub report: Option<CompatibilityReport>,
    /// Message of the latest failure
    pub last_error: Option<String>,
}

impl OrchestratorSnapshot {
    /// Whether an analysis or migration is running (drives the UI spinner)
    #[inline]
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.phase.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_allowed() {
        let path = [
            Phase::Idle,
            Phase::Analyzing,
            Phase::Analyzed,
            Phase::Migrating,
            Phase::Done,
            Phase::Idle,
        ];
        for pair in path.windows(2) {
            assert!(validate_transition(pair[0], pair[1]).is_ok(), "{pair:?}");
        }
    }

    #[test]
    fn skipping_analysis_is_illegal() {
        assert_eq!(
            validate_transition(Phase::Idle, Phase::Migrating),
            Err(OrchestratorError::IllegalTransition {
                from: Phase::Idle,
                to: Phase::Migrating
            })
        );
        assert!(validate_transition(Phase::Idle, Phase::Done).is_err());
        assert!(validate_transition(Phase::Analyzing, Phase::Done).is_err());
    }

    #[test]
    fn every_phase_can_start_a_request_except_idle_self_loop() {
        for phase in [
            Phase::Idle,
            Phase::Analyzing,
            Phase::Analyzed,
            Phase::Migrating,
            Phase::Done,
            Phase::Failed,
        ] {
            assert!(validate_transition(phase, Phase::Analyzing).is_ok());
        }
        assert!(validate_transition(Phase::Idle, Phase::Idle).is_err());
    }

    #[test]
    fn busy_phases() {
        assert!(Phase::Analyzing.is_busy());
        assert!(Phase::Migrating.is_busy());
        assert!(!Phase::Analyzed.is_busy());
        assert!(!OrchestratorSnapshot::default().is_analyzing());
    }
}
