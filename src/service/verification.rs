//! Per-claim lookups against the knowledge graph

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::graph::{GraphClient, GraphError, Record, Statement, case_params, field};
use crate::model::{CheckerConfig, Claim, ClaimKind};

/// Resolves pending claims with one targeted lookup each
#[derive(Debug, Clone)]
pub struct GraphVerifier {
    min_shared_tokens: usize,
    max_concurrent_lookups: usize,
}

impl GraphVerifier {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            min_shared_tokens: config.min_shared_tokens,
            max_concurrent_lookups: config.max_concurrent_lookups.max(1),
        }
    }

    /// Resolve every claim, keeping input order; the first graph failure aborts the pass
    pub async fn verify_all(
        &self,
        graph: &dyn GraphClient,
        claims: Vec<Claim>,
    ) -> Result<Vec<Claim>, GraphError> {
        let total = claims.len();

        let verified: Vec<Claim> = stream::iter(claims)
            .map(|claim| self.verify_claim(graph, claim))
            .buffered(self.max_concurrent_lookups)
            .try_collect()
            .await?;

        tracing::debug!(
            claims = total,
            confirmed = verified.iter().filter(|c| c.confirmed()).count(),
            "Verified claims against graph"
        );

        Ok(verified)
    }

    pub async fn verify_claim(
        &self,
        graph: &dyn GraphClient,
        mut claim: Claim,
    ) -> Result<Claim, GraphError> {
        // negation claims arrive resolved
        if claim.verified() {
            return Ok(claim);
        }

        let statement = match claim.kind {
            ClaimKind::CaseReference => Statement::CaseByIdentifier,
            ClaimKind::Reporter => Statement::ReportersOfCase,
            ClaimKind::Article => Statement::ArticlesOfCase,
            ClaimKind::Theme => Statement::ThemesOfCase,
            ClaimKind::Negation => {
                claim.resolve(false);
                return Ok(claim);
            }
        };

        let rows = graph
            .query(statement, case_params(&claim.subject_case))
            .await?;

        let confirmed = match claim.kind {
            ClaimKind::CaseReference => !rows.is_empty(),
            ClaimKind::Reporter => reporter_matches(&column(&rows, "nome"), &claim.value),
            ClaimKind::Article => article_matches(&column(&rows, "artigo"), &claim.value),
            ClaimKind::Theme => theme_matches(
                &column(&rows, "descricao"),
                &claim.value,
                self.min_shared_tokens,
            ),
            ClaimKind::Negation => false,
        };

        tracing::trace!(
            kind = claim.kind.as_str(),
            case = %claim.subject_case,
            value = %claim.value,
            rows = rows.len(),
            confirmed,
            "Claim lookup"
        );

        claim.resolve(confirmed);
        Ok(claim)
    }
}

fn column<'a>(rows: &'a [Record], name: &str) -> Vec<&'a str> {
    rows.iter().filter_map(|row| field(row, name)).collect()
}

/// Any linked name contains, or is contained in, the claimed name
///
/// Blank names on either side never match.
pub fn reporter_matches(names: &[&str], claimed: &str) -> bool {
    let claimed = claimed.trim().to_lowercase();
    if claimed.is_empty() {
        return false;
    }
    names.iter().filter(|name| !name.trim().is_empty()).any(|name| {
        let name = name.trim().to_lowercase();
        name.contains(&claimed) || claimed.contains(&name)
    })
}

/// The claim's leading number appears in some linked article citation
pub fn article_matches(articles: &[&str], claimed: &str) -> bool {
    let Some(number) = claimed
        .split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
    else {
        return false;
    };
    articles.iter().any(|article| article.contains(number))
}

/// Enough shared words, or one description inside the other
///
/// Blank descriptions on either side never match.
pub fn theme_matches(descriptions: &[&str], claimed: &str, min_shared_tokens: usize) -> bool {
    let claimed = claimed.trim().to_lowercase();
    if claimed.is_empty() {
        return false;
    }
    let claimed_tokens: Vec<&str> = claimed.split_whitespace().collect();

    descriptions.iter().filter(|d| !d.trim().is_empty()).any(|description| {
        let description = description.trim().to_lowercase();
        let mut shared: Vec<&str> = description
            .split_whitespace()
            .filter(|t| claimed_tokens.contains(t))
            .collect();
        shared.sort_unstable();
        shared.dedup();

        shared.len() >= min_shared_tokens
            || description.contains(&claimed)
            || claimed.contains(&description)
    })
}
