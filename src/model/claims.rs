use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subject used by negation claims that are not tied to a specific case
pub const NO_SUBJECT: &str = "N/A";

/// Kind of checkable assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    CaseReference,
    Reporter,
    Article,
    Theme,
    Negation,
}

impl ClaimKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::CaseReference => "case_reference",
            ClaimKind::Reporter => "reporter",
            ClaimKind::Article => "article",
            ClaimKind::Theme => "theme",
            ClaimKind::Negation => "negation",
        }
    }
}

/// A single factual assertion extracted from an answer
///
/// `confirmed` can only be set through [`Claim::resolve`], which also marks the
/// claim as verified. Deserialization rejects a confirmed claim that is not verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "StoredClaim")]
pub struct Claim {
    pub kind: ClaimKind,
    pub subject_case: String,
    pub value: String,
    verified: bool,
    confirmed: bool,
}

impl Claim {
    /// A claim awaiting verification
    pub fn pending(
        kind: ClaimKind,
        subject_case: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject_case: subject_case.into(),
            value: value.into(),
            verified: false,
            confirmed: false,
        }
    }

    /// A claim whose verification outcome is already known
    pub fn resolved(
        kind: ClaimKind,
        subject_case: impl Into<String>,
        value: impl Into<String>,
        confirmed: bool,
    ) -> Self {
        let mut claim = Self::pending(kind, subject_case, value);
        claim.resolve(confirmed);
        claim
    }

    /// Record the outcome of a verification attempt
    pub fn resolve(&mut self, confirmed: bool) {
        self.verified = true;
        self.confirmed = confirmed;
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Structural identity used for deduplication within one extraction pass
    pub fn dedup_key(&self) -> (ClaimKind, String, String) {
        (self.kind, self.subject_case.clone(), self.value.to_lowercase())
    }
}

/// Wire form of [`Claim`], checked before it becomes one
#[derive(Deserialize)]
struct StoredClaim {
    kind: ClaimKind,
    subject_case: String,
    value: String,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    confirmed: bool,
}

impl TryFrom<StoredClaim> for Claim {
    type Error = String;

    fn try_from(stored: StoredClaim) -> Result<Self, Self::Error> {
        if stored.confirmed && !stored.verified {
            return Err(format!(
                "{} claim '{}' is confirmed but not verified",
                stored.kind.as_str(),
                stored.value
            ));
        }

        let mut claim = Claim::pending(stored.kind, stored.subject_case, stored.value);
        if stored.verified {
            claim.resolve(stored.confirmed);
        }
        Ok(claim)
    }
}

/// Closeness between two independently computed fidelity scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AgreementLevel {
    High,
    Moderate,
    Low,
}

impl AgreementLevel {
    /// Classify an absolute score difference (percentage points)
    pub fn from_difference(difference: f64) -> Self {
        if difference <= 10.0 {
            AgreementLevel::High
        } else if difference <= 25.0 {
            AgreementLevel::Moderate
        } else {
            AgreementLevel::Low
        }
    }
}

/// Agreement of the checker with another verifier's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Agreement {
    pub other_verifier: String,
    pub other_score: f64,
    pub difference: f64,
    pub level: AgreementLevel,
}

/// Outcome of verifying one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckerResult {
    pub total: usize,
    pub confirmed_count: usize,
    pub unconfirmed_count: usize,
    /// Percentage of confirmed claims, 0.0 when there are no claims
    pub score: f64,
    pub claims: Vec<Claim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_with_other_verifier: Option<Agreement>,
}

impl CheckerResult {
    /// Tally resolved claims; unresolved claims count as unconfirmed
    pub fn from_claims(claims: Vec<Claim>) -> Self {
        let total = claims.len();
        let confirmed_count = claims.iter().filter(|c| c.confirmed()).count();
        let score = if total == 0 {
            0.0
        } else {
            confirmed_count as f64 / total as f64 * 100.0
        };

        Self {
            total,
            confirmed_count,
            unconfirmed_count: total - confirmed_count,
            score,
            claims,
            agreement_with_other_verifier: None,
        }
    }

    pub fn with_agreement(mut self, agreement: Agreement) -> Self {
        self.agreement_with_other_verifier = Some(agreement);
        self
    }
}

/// Structured comparison between two verifiers, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreComparison {
    pub primary: String,
    pub primary_score: f64,
    pub other: String,
    pub other_score: f64,
    pub difference: f64,
    pub level: AgreementLevel,
    pub claims: Vec<Claim>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_claim_is_neither_verified_nor_confirmed() {
        let claim = Claim::pending(ClaimKind::Reporter, "HC 161.450", "Gilmar Mendes");
        assert!(!claim.verified());
        assert!(!claim.confirmed());
    }

    #[test]
    fn test_resolve_marks_verified() {
        let mut claim = Claim::pending(ClaimKind::Article, "HC 161.450", "art. 5º");
        claim.resolve(false);
        assert!(claim.verified());
        assert!(!claim.confirmed());

        claim.resolve(true);
        assert!(claim.verified() && claim.confirmed());
    }

    #[test]
    fn test_dedup_key_ignores_value_case() {
        let a = Claim::pending(ClaimKind::Reporter, "HC 1", "Gilmar Mendes");
        let b = Claim::pending(ClaimKind::Reporter, "HC 1", "GILMAR MENDES");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_agreement_thresholds() {
        assert_eq!(AgreementLevel::from_difference(8.0), AgreementLevel::High);
        assert_eq!(AgreementLevel::from_difference(10.0), AgreementLevel::High);
        assert_eq!(AgreementLevel::from_difference(20.0), AgreementLevel::Moderate);
        assert_eq!(AgreementLevel::from_difference(25.0), AgreementLevel::Moderate);
        assert_eq!(AgreementLevel::from_difference(40.0), AgreementLevel::Low);
    }

    #[test]
    fn test_score_is_confirmed_percentage() {
        let claims = vec![
            Claim::resolved(ClaimKind::CaseReference, "HC 1", "HC 1", true),
            Claim::resolved(ClaimKind::Reporter, "HC 1", "Gilmar Mendes", true),
            Claim::resolved(ClaimKind::Article, "HC 1", "art. 5º", true),
            Claim::resolved(ClaimKind::Theme, "HC 1", "vaquejada", false),
        ];
        let result = CheckerResult::from_claims(claims);

        assert_eq!(result.total, 4);
        assert_eq!(result.confirmed_count, 3);
        assert_eq!(result.unconfirmed_count, 1);
        assert_eq!(result.score, 75.0);
        assert!(result.agreement_with_other_verifier.is_none());
    }

    #[test]
    fn test_no_claims_scores_zero() {
        let result = CheckerResult::from_claims(Vec::new());
        assert_eq!(result.total, 0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_deserialize_keeps_resolution() {
        let claim = Claim::resolved(ClaimKind::Reporter, "HC 1", "Gilmar Mendes", true);
        let json = serde_json::to_string(&claim).unwrap();
        assert_eq!(serde_json::from_str::<Claim>(&json).unwrap(), claim);

        let pending: Claim = serde_json::from_str(
            r#"{"kind": "theme", "subject_case": "HC 1", "value": "vaquejada"}"#,
        )
        .unwrap();
        assert!(!pending.verified() && !pending.confirmed());
    }

    #[test]
    fn test_deserialize_rejects_confirmed_unverified() {
        let result = serde_json::from_str::<Claim>(
            r#"{"kind": "reporter", "subject_case": "HC 1", "value": "X", "verified": false, "confirmed": true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_claim_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ClaimKind::CaseReference).unwrap();
        assert_eq!(json, "\"case_reference\"");
    }
}
