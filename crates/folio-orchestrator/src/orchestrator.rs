//! Migration orchestrator
//!
//! The stateful entry point the UI talks to:
//! - Runs the compatibility analysis and caches the latest report
//! - Re-checks compatibility and runs the migration on confirmation
//! - Single-flights requests per instance (last request wins)
//! - Turns every failure into a [`MigrationResult::Failure`]; the caller's
//!   content is never touched

use crate::backend::{AnalysisBackend, LocalAnalysis};
use crate::cancel::CancellationToken;
use crate::error::OrchestratorError;
use crate::state::{validate_transition, OrchestratorSnapshot, Phase};
use crate::types::{
    MigrationConfig, MigrationFailure, MigrationResult, MigrationSuccess, RequestId,
};
use folio_migration::{CompatibilityReport, ContentMigrator, MigratedContent, MigrationNotes};
use folio_schema::{PortfolioContent, TemplateDefinition, TemplateRegistry};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mutable state; the lock is never held across an await point
#[derive(Debug, Default)]
struct Inner {
    phase: Phase,
    issued: u64,
    current: Option<RequestId>,
    token: Option<CancellationToken>,
    report: Option<CompatibilityReport>,
    last_error: Option<String>,
}

impl Inner {
    fn transition(&mut self, to: Phase) -> Result<(), OrchestratorError> {
        validate_transition(self.phase, to)?;
        tracing::debug!(from = ?self.phase, to = ?to, "phase transition");
        self.phase = to;
        Ok(())
    }

    /// Start a request, cancelling whatever was in flight
    fn begin(&mut self) -> Result<(RequestId, CancellationToken), OrchestratorError> {
        self.transition(Phase::Analyzing)?;
        self.issued += 1;
        let request = RequestId(self.issued);
        let token = CancellationToken::new();

        if let Some(previous) = self.token.replace(token.clone()) {
            previous.cancel();
        }
        if let Some(previous) = self.current.replace(request) {
            tracing::debug!(%previous, %request, "request superseded");
        }
        self.report = None;
        self.last_error = None;
        Ok((request, token))
    }

    fn ensure_current(&self, request: RequestId) -> Result<(), OrchestratorError> {
        match self.current {
            Some(current) if current == request => Ok(()),
            Some(current) if current > request => Err(OrchestratorError::Superseded { request }),
            _ => Err(OrchestratorError::Cancelled { request }),
        }
    }

    fn fail(&mut self, err: &OrchestratorError) {
        if let Err(e) = self.transition(Phase::Failed) {
            tracing::warn!("Could not record failure: {}", e);
        }
        self.token = None;
        self.report = None;
        self.last_error = Some(err.to_string());
    }

    fn abandon(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.current = None;
        self.report = None;
    }

    fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            phase: self.phase,
            request: self.current,
            report: self.report.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Stateful template-switch coordinator
///
/// One instance per editing session. Every public operation is safe to call
/// concurrently; a newer request always wins over an older in-flight one.
pub struct MigrationOrchestrator<B = LocalAnalysis> {
    /// Configuration
    config: MigrationConfig,
    /// Report source
    backend: B,
    /// Content transform
    migrator: ContentMigrator,
    /// Lifecycle state
    inner: Mutex<Inner>,
}

impl MigrationOrchestrator<LocalAnalysis> {
    /// Create orchestrator with the in-process analyzer
    #[inline]
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        let backend = LocalAnalysis::new(config.shape_policy);
        Self::with_backend(config, backend)
    }
}

impl Default for MigrationOrchestrator<LocalAnalysis> {
    fn default() -> Self {
        Self::new(MigrationConfig::default())
    }
}

impl<B> std::fmt::Debug for MigrationOrchestrator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationOrchestrator")
            .field("config", &self.config)
            .field("phase", &self.inner.lock().phase)
            .finish_non_exhaustive()
    }
}

impl<B: AnalysisBackend> MigrationOrchestrator<B> {
    /// Create orchestrator with a custom analysis backend
    #[must_use]
    pub fn with_backend(config: MigrationConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            migrator: ContentMigrator::default(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// With content migrator (custom alias table)
    #[inline]
    #[must_use]
    pub fn with_migrator(mut self, migrator: ContentMigrator) -> Self {
        self.migrator = migrator;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Report of the latest successful analysis, if still current
    #[must_use]
    pub fn report(&self) -> Option<CompatibilityReport> {
        self.inner.lock().report.clone()
    }

    /// Whether a request is in flight
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.inner.lock().phase.is_busy()
    }

    /// Point-in-time view of the orchestrator
    #[must_use]
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.inner.lock().snapshot()
    }

    /// Analyze a template change and cache the report
    ///
    /// Returns `None` on failure (logged) or when a newer request or a
    /// cancel made this one stale.
    pub async fn analyze_change(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Option<CompatibilityReport> {
        match self.try_analyze_change(from, to, content).await {
            Ok(report) => Some(report),
            Err(err) if err.is_stale() => {
                tracing::debug!("Discarding stale analysis: {}", err);
                None
            }
            Err(err) => {
                tracing::error!("Template analysis failed: {}", err);
                None
            }
        }
    }

    /// Analyze a template change, surfacing the error
    ///
    /// # Errors
    /// - `OrchestratorError::Analysis` if a template is malformed
    /// - `OrchestratorError::Timeout` if the backend exceeds the limit
    /// - `OrchestratorError::Superseded` / `Cancelled` if the request went stale
    pub async fn try_analyze_change(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, OrchestratorError> {
        let (request, token) = self.inner.lock().begin()?;
        tracing::info!(%request, "Analyzing template change {} -> {}", from.id, to.id);

        self.run_analysis(request, &token, from, to, content).await
    }

    /// Re-check compatibility and migrate the content
    ///
    /// Never panics or returns an error: every failure is folded into
    /// [`MigrationResult::Failure`].
    pub async fn change_template(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> MigrationResult {
        match self.try_change_template(from, to, content).await {
            Ok(success) => MigrationResult::Success(success),
            Err(err) => {
                if err.is_stale() {
                    tracing::debug!("Discarding stale migration: {}", err);
                } else {
                    tracing::error!("Template migration failed: {}", err);
                }
                MigrationResult::Failure(MigrationFailure::from(err))
            }
        }
    }

    /// Re-check compatibility and migrate the content, surfacing the error
    ///
    /// # Errors
    /// Everything [`try_analyze_change`](Self::try_analyze_change) returns, plus
    /// - `OrchestratorError::Incompatible` if `block_incompatible` is set and
    ///   the analysis reports issues
    /// - `OrchestratorError::Migration` if the transform fails
    pub async fn try_change_template(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<MigrationSuccess, OrchestratorError> {
        let (request, token) = self.inner.lock().begin()?;
        tracing::info!(%request, "Changing template {} -> {}", from.id, to.id);

        let analysis = self.run_analysis(request, &token, from, to, content).await?;

        let mut inner = self.inner.lock();
        inner.ensure_current(request)?;

        if self.config.block_incompatible && !analysis.compatible {
            let err = OrchestratorError::Incompatible {
                issues: analysis.issues.clone(),
            };
            inner.fail(&err);
            return Err(err);
        }

        inner.transition(Phase::Migrating)?;
        match self.migrator.migrate_with_notes(from, to, content) {
            Ok(MigratedContent { content, notes }) => {
                inner.transition(Phase::Done)?;
                inner.token = None;
                let message = summarize(to, &notes);
                tracing::info!(%request, "{}", message);
                Ok(MigrationSuccess {
                    content,
                    analysis,
                    message,
                    notes,
                })
            }
            Err(source) => {
                let err = OrchestratorError::from(source);
                inner.fail(&err);
                Err(err)
            }
        }
    }

    /// [`try_analyze_change`](Self::try_analyze_change) with templates looked up by id
    ///
    /// # Errors
    /// `OrchestratorError::UnknownTemplate` if either id is not registered,
    /// otherwise as `try_analyze_change`
    pub async fn analyze_change_by_id(
        &self,
        registry: &TemplateRegistry,
        from_id: &str,
        to_id: &str,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, OrchestratorError> {
        let (from, to) = resolve(registry, from_id, to_id)?;
        self.try_analyze_change(&from, &to, content).await
    }

    /// [`change_template`](Self::change_template) with templates looked up by id
    pub async fn change_template_by_id(
        &self,
        registry: &TemplateRegistry,
        from_id: &str,
        to_id: &str,
        content: &PortfolioContent,
    ) -> MigrationResult {
        match resolve(registry, from_id, to_id) {
            Ok((from, to)) => self.change_template(&from, &to, content).await,
            Err(err) => {
                tracing::error!("Template migration failed: {}", err);
                MigrationResult::Failure(MigrationFailure::from(err))
            }
        }
    }

    /// Clear the cached report and return to idle
    ///
    /// Any in-flight request is cancelled.
    pub fn reset_analysis(&self) {
        let mut inner = self.inner.lock();
        inner.abandon();
        inner.last_error = None;
        if inner.phase != Phase::Idle {
            if let Err(e) = inner.transition(Phase::Idle) {
                tracing::warn!("Reset failed: {}", e);
            }
        }
    }

    /// Cancel the in-flight request, if any
    ///
    /// Returns `true` if something was cancelled. The cancelled request
    /// resolves to `Cancelled` without touching state.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.phase.is_busy() {
            return false;
        }
        if let Some(request) = inner.current {
            tracing::info!(%request, "Cancelling request");
        }
        inner.abandon();
        if let Err(e) = inner.transition(Phase::Idle) {
            tracing::warn!("Cancel failed: {}", e);
        }
        true
    }

    async fn run_analysis(
        &self,
        request: RequestId,
        token: &CancellationToken,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, OrchestratorError> {
        let limit = self.config.analysis_timeout();
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = tokio::time::timeout(limit, self.backend.analyze(from, to, content)) => Some(result),
        };

        let mut inner = self.inner.lock();
        inner.ensure_current(request)?;
        let Some(outcome) = outcome else {
            return Err(OrchestratorError::Cancelled { request });
        };

        match outcome {
            Ok(Ok(report)) => {
                tracing::debug!(
                    %request,
                    compatible = report.compatible,
                    mappable = report.summary.mappable_sections,
                    unmappable = report.summary.unmappable_sections,
                    "analysis complete"
                );
                inner.transition(Phase::Analyzed)?;
                inner.report = Some(report.clone());
                Ok(report)
            }
            Ok(Err(source)) => {
                let err = OrchestratorError::from(source);
                inner.fail(&err);
                Err(err)
            }
            Err(_elapsed) => {
                let err = OrchestratorError::Timeout {
                    duration_secs: self.config.analysis_timeout_secs,
                };
                inner.fail(&err);
                Err(err)
            }
        }
    }
}

fn resolve(
    registry: &TemplateRegistry,
    from_id: &str,
    to_id: &str,
) -> Result<(Arc<TemplateDefinition>, Arc<TemplateDefinition>), OrchestratorError> {
    let from = registry
        .get(from_id)
        .ok_or_else(|| OrchestratorError::unknown_template(from_id))?;
    let to = registry
        .get(to_id)
        .ok_or_else(|| OrchestratorError::unknown_template(to_id))?;
    Ok((from, to))
}

fn summarize(to: &TemplateDefinition, notes: &MigrationNotes) -> String {
    let mut message = format!(
        "Migrated to template \"{}\": {} section(s) carried over",
        to.id,
        notes.direct.len()
    );
    if !notes.aliases_applied.is_empty() {
        message.push_str(&format!(", {} remapped", notes.aliases_applied.len()));
    }
    if !notes.dropped_sections.is_empty() {
        message.push_str(&format!(", {} dropped", notes.dropped_sections.len()));
    }
    message
}
