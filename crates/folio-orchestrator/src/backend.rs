//! Analysis backend
//!
//! The orchestrator asks a backend for the compatibility report. The local
//! backend runs the pure analyzer in-process; hosts that analyze remotely
//! implement [`AnalysisBackend`] over their transport.

use folio_migration::{AnalysisError, CompatibilityAnalyzer, CompatibilityReport, ShapePolicy};
use folio_schema::{PortfolioContent, TemplateDefinition};
use std::sync::Arc;

/// Source of compatibility reports
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze switching `content` from `from` to `to`
    async fn analyze(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, AnalysisError>;
}

#[async_trait::async_trait]
impl<B: AnalysisBackend + ?Sized> AnalysisBackend for Arc<B> {
    async fn analyze(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, AnalysisError> {
        (**self).analyze(from, to, content).await
    }
}

/// In-process backend over [`CompatibilityAnalyzer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalysis {
    analyzer: CompatibilityAnalyzer,
}

impl LocalAnalysis {
    /// Create local backend with shape policy
    #[inline]
    #[must_use]
    pub fn new(policy: ShapePolicy) -> Self {
        Self {
            analyzer: CompatibilityAnalyzer::new(policy),
        }
    }

    /// Underlying analyzer
    #[inline]
    #[must_use]
    pub fn analyzer(&self) -> &CompatibilityAnalyzer {
        &self.analyzer
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for LocalAnalysis {
    async fn analyze(
        &self,
        from: &TemplateDefinition,
        to: &TemplateDefinition,
        content: &PortfolioContent,
    ) -> Result<CompatibilityReport, AnalysisError> {
        self.analyzer.analyze(from, to, content)
    }
}
