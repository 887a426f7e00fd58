//! Last-request-wins behavior under overlapping calls.

use async_trait::async_trait;
use folio_migration::{AnalysisError, CompatibilityAnalyzer, CompatibilityReport};
use folio_orchestrator::{
    AnalysisBackend, FailureReason, MigrationConfig, MigrationOrchestrator, OrchestratorError,
    Phase, RequestId,
};
use folio_schema::{PortfolioContent, TemplateDefinition};
use folio_test_utils::{init_test_tracing, scenario_hero_to_header, scenario_overlap};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Backend whose first call blocks until released; later calls answer at once
#[derive(Default)]
struct GatedBackend {
    held: AtomicBool,
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
}

#[async_trait]
impl AnalysisBackend for GatedBackend {
    async fn analyze(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.held.swap(true, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        CompatibilityAnalyzer::default().analyze(from, to, content)
    }
}

fn gated() -> (Arc<GatedBackend>, Arc<MigrationOrchestrator<Arc<GatedBackend>>>) {
    init_test_tracing();
    let backend = Arc::new(GatedBackend::default());
    let orchestrator = Arc::new(MigrationOrchestrator::with_backend(
        MigrationConfig::default(),
        Arc::clone(&backend),
    ));
    (backend, orchestrator)
}

#[tokio::test]
async fn newer_analysis_supersedes_older() -> anyhow::Result<()> {
    let (backend, orchestrator) = gated();
    let first = scenario_overlap();
    let second = scenario_hero_to_header();

    let stale = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .try_analyze_change(&first.from, &first.to, &first.content)
                .await
        })
    };
    backend.started.notified().await;
    assert!(orchestrator.is_analyzing());

    let report = orchestrator
        .try_analyze_change(&second.from, &second.to, &second.content)
        .await?;

    let stale = stale.await?;
    assert_eq!(
        stale,
        Err(OrchestratorError::Superseded {
            request: RequestId(1)
        })
    );

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, Phase::Analyzed);
    assert_eq!(snapshot.request, Some(RequestId(2)));
    assert_eq!(snapshot.report, Some(report));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn superseded_migration_applies_nothing() -> anyhow::Result<()> {
    let (backend, orchestrator) = gated();
    let first = scenario_overlap();
    let second = scenario_hero_to_header();

    let stale = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .change_template(&first.from, &first.to, &first.content)
                .await
        })
    };
    backend.started.notified().await;

    let latest = orchestrator
        .change_template(&second.from, &second.to, &second.content)
        .await;
    let stale = stale.await?;

    let failure = stale.failure().expect("older request must not succeed");
    assert_eq!(failure.reason, FailureReason::Superseded);
    assert!(!failure.retryable);
    assert!(stale.content().is_none());

    assert!(latest.is_success());
    assert!(latest.content().is_some_and(|c| c.contains("header")));
    assert_eq!(orchestrator.phase(), Phase::Done);
    Ok(())
}

#[tokio::test]
async fn cancel_abandons_in_flight_request() -> anyhow::Result<()> {
    let (backend, orchestrator) = gated();
    let s = scenario_overlap();

    let pending = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.analyze_change(&s.from, &s.to, &s.content).await })
    };
    backend.started.notified().await;

    assert!(orchestrator.cancel());
    assert!(pending.await?.is_none());

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.request, None);
    assert_eq!(snapshot.report, None);
    assert_eq!(snapshot.last_error, None);
    Ok(())
}

#[tokio::test]
async fn cancelled_request_reports_cancelled() -> anyhow::Result<()> {
    let (backend, orchestrator) = gated();
    let s = scenario_overlap();

    let pending = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .try_analyze_change(&s.from, &s.to, &s.content)
                .await
        })
    };
    backend.started.notified().await;
    orchestrator.reset_analysis();

    assert_eq!(
        pending.await?,
        Err(OrchestratorError::Cancelled {
            request: RequestId(1)
        })
    );
    assert_eq!(orchestrator.phase(), Phase::Idle);
    Ok(())
}

#[tokio::test]
async fn released_request_completes_normally() -> anyhow::Result<()> {
    let (backend, orchestrator) = gated();
    let s = scenario_overlap();

    let pending = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.analyze_change(&s.from, &s.to, &s.content).await })
    };
    backend.started.notified().await;
    backend.release.notify_one();

    let report = pending.await?.expect("report");
    assert_eq!(orchestrator.report(), Some(report));
    assert_eq!(orchestrator.phase(), Phase::Analyzed);
    Ok(())
}
