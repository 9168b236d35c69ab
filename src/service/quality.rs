//! One processed question end to end: checker, reviewer metrics, comparison, log

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    Agreement, CheckerResult, QualityLogEntry, QualityMetrics, QualityReport, ScoreComparison,
};
use crate::service::checker::{CheckerError, DeterministicChecker};
use crate::service::metrics_parser::MetricsParser;
use crate::service::quality_log::{QualityLog, QualityLogError, render_report};
use crate::service::scoring::{compare, render_comparison, render_metrics_summary};
use crate::service::verifier::{SelfReportedVerifier, Verifier};

/// Everything produced for one question
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QualityOutcome {
    pub checker: CheckerResult,
    /// Reviewer metrics; defaults when no reviewer text was supplied
    pub metrics: QualityMetrics,
    pub comparisons: Vec<ScoreComparison>,
    /// Present only when reviewer text was supplied
    pub summary: Option<String>,
    pub comparison_text: Option<String>,
    /// False when the log append failed; the outcome is still valid
    pub logged: bool,
}

/// Runs the checker and reviewer side of one question and records the outcome
pub struct QualityService {
    checker: Arc<DeterministicChecker>,
    parser: Arc<MetricsParser>,
    log: QualityLog,
}

impl QualityService {
    pub fn new(
        checker: Arc<DeterministicChecker>,
        parser: Arc<MetricsParser>,
        log: QualityLog,
    ) -> Self {
        tracing::info!(path = %log.path().display(), "Quality service initialized");
        Self { checker, parser, log }
    }

    pub fn parser(&self) -> &MetricsParser {
        &self.parser
    }

    /// Verify an answer and log the outcome
    ///
    /// `deadline` bounds the checker pass; the configured one applies when absent.
    pub async fn process(
        &self,
        question: &str,
        answer: &str,
        reviewer_text: Option<&str>,
        deadline: Option<Duration>,
    ) -> Result<QualityOutcome, CheckerError> {
        let primary = match deadline {
            Some(deadline) => self.checker.verify_within(answer, question, deadline).await?,
            None => self.checker.verify(answer, question).await?,
        };

        let mut others = Vec::new();
        if let Some(text) = reviewer_text {
            let reviewer = SelfReportedVerifier::new(text, self.parser.clone());
            others.push(reviewer.verify(answer, question).await?);
        }

        let comparisons = compare(&primary, &others);
        let metrics = others
            .iter()
            .find_map(|v| v.metrics().cloned())
            .unwrap_or_default();

        let mut checker = match primary.checker_result() {
            Some(result) => result.clone(),
            None => CheckerResult::from_claims(Vec::new()),
        };
        if let Some(comparison) = comparisons.first() {
            checker = checker.with_agreement(Agreement::from(comparison));
        }

        let entry = QualityLogEntry::new(
            question,
            metrics.clone(),
            answer,
            reviewer_text.unwrap_or_default(),
            Some(checker.clone()),
        );
        let logged = match self.append(entry).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to append quality log entry");
                false
            }
        };

        tracing::info!(
            question_chars = question.chars().count(),
            checker_score = checker.score,
            reviewer_score = reviewer_text.map(|_| metrics.fidelity_score),
            logged,
            "Processed question"
        );

        Ok(QualityOutcome {
            summary: reviewer_text.map(|_| render_metrics_summary(&metrics)),
            comparison_text: comparisons.first().map(render_comparison),
            checker,
            metrics,
            comparisons,
            logged,
        })
    }

    async fn append(&self, entry: QualityLogEntry) -> Result<(), QualityLogError> {
        let log = self.log.clone();
        tokio::task::spawn_blocking(move || log.append(&entry))
            .await
            .map_err(|e| QualityLogError::Io(std::io::Error::other(e)))?
    }

    pub async fn report(&self) -> Result<QualityReport, QualityLogError> {
        let log = self.log.clone();
        tokio::task::spawn_blocking(move || log.report())
            .await
            .map_err(|e| QualityLogError::Io(std::io::Error::other(e)))?
    }

    pub async fn report_text(&self) -> Result<String, QualityLogError> {
        Ok(render_report(&self.report().await?))
    }

    pub async fn entries(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<QualityLogEntry>, QualityLogError> {
        let log = self.log.clone();
        tokio::task::spawn_blocking(move || log.recent(limit))
            .await
            .map_err(|e| QualityLogError::Io(std::io::Error::other(e)))?
    }
}
