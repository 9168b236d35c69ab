//! Deterministic re-verification of an answer against the knowledge graph

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::graph::{GraphClient, GraphError};
use crate::model::{CheckerConfig, CheckerResult, VocabularyConfig};
use crate::service::claims::{ClaimBuilder, PatternError};
use crate::service::negation::NegationDetector;
use crate::service::verification::GraphVerifier;
use crate::service::verifier::{Evidence, Verification, Verifier};

/// Why a checker pass was abandoned
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("Knowledge graph unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Verification did not finish within {0:?}")]
    Timeout(Duration),
}

impl From<GraphError> for CheckerError {
    fn from(e: GraphError) -> Self {
        CheckerError::DataSourceUnavailable(e.to_string())
    }
}

/// Rule-based verifier scoring an answer by the share of its claims the graph confirms
pub struct DeterministicChecker {
    graph: Arc<dyn GraphClient>,
    builder: ClaimBuilder,
    negation: NegationDetector,
    verifier: GraphVerifier,
    deadline: Duration,
}

impl DeterministicChecker {
    pub const NAME: &'static str = "deterministic_checker";

    /// Compile the extraction and negation patterns from the vocabulary
    pub fn new(
        graph: Arc<dyn GraphClient>,
        checker: &CheckerConfig,
        vocab: &VocabularyConfig,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            graph,
            builder: ClaimBuilder::new(vocab)?,
            negation: NegationDetector::new(vocab, checker)?,
            verifier: GraphVerifier::new(checker),
            deadline: checker.verification_timeout(),
        })
    }

    /// Run one full pass: negation probe and claim verification side by side
    pub async fn check(&self, answer: &str, question: &str) -> Result<CheckerResult, CheckerError> {
        self.check_within(answer, question, self.deadline).await
    }

    /// Same as [`check`](Self::check) with a caller-supplied deadline
    pub async fn check_within(
        &self,
        answer: &str,
        question: &str,
        deadline: Duration,
    ) -> Result<CheckerResult, CheckerError> {
        tokio::time::timeout(deadline, self.run(answer, question))
            .await
            .map_err(|_| CheckerError::Timeout(deadline))?
    }

    pub async fn verify_within(
        &self,
        answer: &str,
        question: &str,
        deadline: Duration,
    ) -> Result<Verification, CheckerError> {
        let result = self.check_within(answer, question, deadline).await?;
        Ok(self.verification(result))
    }

    fn verification(&self, result: CheckerResult) -> Verification {
        Verification {
            verifier: Self::NAME.to_string(),
            score: result.score,
            evidence: Evidence::Claims(result),
        }
    }

    async fn run(&self, answer: &str, question: &str) -> Result<CheckerResult, CheckerError> {
        let pending = self.builder.build(answer);

        let (mut claims, verified) = futures::try_join!(
            self.negation.probe(self.graph.as_ref(), answer, question),
            self.verifier.verify_all(self.graph.as_ref(), pending),
        )?;
        claims.extend(verified);

        let result = CheckerResult::from_claims(claims);

        tracing::info!(
            answer_chars = answer.chars().count(),
            claims = result.total,
            confirmed = result.confirmed_count,
            score = result.score,
            "Checker pass complete"
        );

        Ok(result)
    }
}

#[async_trait]
impl Verifier for DeterministicChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn verify(&self, answer: &str, question: &str) -> Result<Verification, CheckerError> {
        let result = self.check(answer, question).await?;
        Ok(self.verification(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CaseRecord, InMemoryGraph, Params, Record, Statement};
    use crate::model::ClaimKind;

    struct UnreachableGraph;

    #[async_trait]
    impl GraphClient for UnreachableGraph {
        async fn query(&self, _: Statement, _: Params) -> Result<Vec<Record>, GraphError> {
            Err(GraphError::ParseError("connection refused".to_string()))
        }
    }

    struct SlowGraph;

    #[async_trait]
    impl GraphClient for SlowGraph {
        async fn query(&self, _: Statement, _: Params) -> Result<Vec<Record>, GraphError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }
    }

    fn checker(graph: Arc<dyn GraphClient>, config: CheckerConfig) -> DeterministicChecker {
        DeterministicChecker::new(graph, &config, &VocabularyConfig::default()).unwrap()
    }

    fn graph() -> Arc<dyn GraphClient> {
        Arc::new(InMemoryGraph::new(vec![
            CaseRecord::new("HC 161.450")
                .reporter("Gilmar Mendes")
                .article("art. 5º, XXXV")
                .theme("uso medicinal de canábis"),
        ]))
    }

    #[tokio::test]
    async fn test_full_pass_scores_claims() {
        let answer = "No HC 161.450, relator Gilmar Mendes, o tribunal aplicou o art. 33 da Lei.";
        let result = checker(graph(), CheckerConfig::default())
            .check(answer, "Quem relatou o HC 161.450?")
            .await
            .unwrap();

        // case and reporter confirmed, article 33 is not linked
        assert_eq!(result.total, 3);
        assert_eq!(result.confirmed_count, 2);
        assert!((result.score - 66.666).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_negation_claims_come_first() {
        let answer = "Não há registro de decisões sobre cannabis, exceto menções ao HC 161.450.";
        let result = checker(graph(), CheckerConfig::default())
            .check(answer, "Quais decisões tratam de cannabis?")
            .await
            .unwrap();

        assert_eq!(result.claims[0].kind, ClaimKind::Negation);
        assert!(!result.claims[0].confirmed());
        assert_eq!(result.claims[1].kind, ClaimKind::CaseReference);
        assert_eq!(result.total, 2);
        assert_eq!(result.score, 50.0);
    }

    #[tokio::test]
    async fn test_no_claims() {
        let result = checker(graph(), CheckerConfig::default())
            .check("Resposta genérica.", "?")
            .await
            .unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn test_graph_failure_is_fatal() {
        let result = checker(Arc::new(UnreachableGraph), CheckerConfig::default())
            .check("O HC 161.450 foi julgado.", "?")
            .await;
        assert!(matches!(result, Err(CheckerError::DataSourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_deadline() {
        let config = CheckerConfig {
            verification_timeout_secs: 0,
            ..CheckerConfig::default()
        };
        let result = checker(Arc::new(SlowGraph), config)
            .check("O HC 161.450 foi julgado.", "?")
            .await;
        assert!(matches!(result, Err(CheckerError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_caller_deadline_overrides_config() {
        // configured deadline is generous; the caller's is not
        let result = checker(Arc::new(SlowGraph), CheckerConfig::default())
            .check_within("O HC 161.450 foi julgado.", "?", Duration::from_millis(20))
            .await;
        assert!(matches!(
            result,
            Err(CheckerError::Timeout(d)) if d == Duration::from_millis(20)
        ));

        let verification = checker(graph(), CheckerConfig::default())
            .verify_within("O HC 161.450 foi julgado.", "?", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(verification.verifier, DeterministicChecker::NAME);
        assert_eq!(verification.score, 100.0);
    }
}
