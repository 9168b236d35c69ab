//! Claim extraction from free-form answers
//!
//! Case identifiers become `case_reference` claims directly. Every other
//! reference is attached to the closest case identifier and dropped when the
//! answer mentions no case at all.

pub mod error;
pub mod patterns;
pub mod proximity;
pub mod synthesis;

use crate::model::{Claim, ClaimKind, VocabularyConfig};
use patterns::EntityPatterns;
use proximity::nearest_case;
use synthesis::dedup_claims;

pub use error::PatternError;

/// Turns answer text into typed, deduplicated claims
pub struct ClaimBuilder {
    patterns: EntityPatterns,
}

impl ClaimBuilder {
    pub fn new(vocab: &VocabularyConfig) -> Result<Self, PatternError> {
        Ok(Self {
            patterns: EntityPatterns::new(vocab)?,
        })
    }

    /// Extract pending claims: case references first, then the rest by offset
    pub fn build(&self, text: &str) -> Vec<Claim> {
        let mentions = self.patterns.case_mentions(text);

        let mut claims: Vec<Claim> = mentions
            .iter()
            .map(|m| Claim::pending(ClaimKind::CaseReference, m.id.clone(), m.id.clone()))
            .collect();

        let mut dropped = 0usize;
        for reference in self.patterns.references(text) {
            match nearest_case(reference.offset, &mentions) {
                Some(case) => claims.push(Claim::pending(reference.kind, case, reference.text)),
                None => dropped += 1,
            }
        }

        let claims = dedup_claims(claims);

        tracing::debug!(
            cases = mentions.len(),
            claims = claims.len(),
            dropped_references = dropped,
            "Extracted claims from answer"
        );

        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ClaimBuilder {
        ClaimBuilder::new(&VocabularyConfig::default()).unwrap()
    }

    #[test]
    fn test_reporter_attaches_to_nearest_case() {
        let text = "HC 161.450 Relator: João Silva, decisão de 2020 sobre o pedido. RE 1.513.210 trata de outro tema.";
        let claims = builder().build(text);

        let reporter = claims
            .iter()
            .find(|c| c.kind == ClaimKind::Reporter)
            .unwrap();
        assert_eq!(reporter.subject_case, "HC 161.450");
        assert_eq!(reporter.value, "João Silva");
    }

    #[test]
    fn test_case_references_come_first() {
        let claims = builder().build("Relator Gilmar Mendes no HC 161.450, art. 5º da CF.");

        assert_eq!(claims[0].kind, ClaimKind::CaseReference);
        assert_eq!(claims[0].value, "HC 161.450");
        assert_eq!(claims[1].kind, ClaimKind::Reporter);
        assert_eq!(claims[2].kind, ClaimKind::Article);
        assert_eq!(claims[2].value, "art. 5º da CF");
        assert!(claims.iter().all(|c| !c.verified()));
    }

    #[test]
    fn test_repeated_mentions_are_deduplicated() {
        let text = "No HC 161.450 o relator Gilmar Mendes votou. Depois, o ministro Gilmar Mendes reafirmou.";
        let claims = builder().build(text);

        let reporters = claims.iter().filter(|c| c.kind == ClaimKind::Reporter).count();
        assert_eq!(reporters, 1);
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn test_references_without_case_are_dropped() {
        let claims = builder().build("O relator Gilmar Mendes citou o art. 5º.");
        assert!(claims.is_empty());
    }
}
