//! Verifier capability shared by the deterministic checker and the reviewer

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::model::{CheckerResult, QualityMetrics};
use crate::service::checker::CheckerError;
use crate::service::metrics_parser::MetricsParser;

/// What a verifier based its score on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Evidence {
    Claims(CheckerResult),
    SelfReport(QualityMetrics),
}

/// A fidelity score produced by one verifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub verifier: String,
    pub score: f64,
    pub evidence: Evidence,
}

impl Verification {
    pub fn checker_result(&self) -> Option<&CheckerResult> {
        match &self.evidence {
            Evidence::Claims(result) => Some(result),
            Evidence::SelfReport(_) => None,
        }
    }

    pub fn metrics(&self) -> Option<&QualityMetrics> {
        match &self.evidence {
            Evidence::SelfReport(metrics) => Some(metrics),
            Evidence::Claims(_) => None,
        }
    }
}

#[async_trait]
pub trait Verifier: Send + Sync {
    fn name(&self) -> &str;

    async fn verify(&self, answer: &str, question: &str) -> Result<Verification, CheckerError>;
}

/// Score taken from the reviewer's own metrics block
pub struct SelfReportedVerifier {
    reviewer_text: String,
    parser: Arc<MetricsParser>,
}

impl SelfReportedVerifier {
    pub const NAME: &'static str = "reviewer";

    pub fn new(reviewer_text: impl Into<String>, parser: Arc<MetricsParser>) -> Self {
        Self {
            reviewer_text: reviewer_text.into(),
            parser,
        }
    }
}

#[async_trait]
impl Verifier for SelfReportedVerifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn verify(&self, _answer: &str, _question: &str) -> Result<Verification, CheckerError> {
        let metrics = self.parser.parse(&self.reviewer_text);
        Ok(Verification {
            verifier: self.name().to_string(),
            score: metrics.fidelity_score,
            evidence: Evidence::SelfReport(metrics),
        })
    }
}
