//! Claim deduplication

use std::collections::HashSet;

use crate::model::Claim;

/// Drop structurally repeated claims, keeping the first occurrence
///
/// Two claims are the same when kind, subject case and lowercased value agree.
pub fn dedup_claims(claims: Vec<Claim>) -> Vec<Claim> {
    let mut seen = HashSet::new();
    claims
        .into_iter()
        .filter(|claim| seen.insert(claim.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClaimKind;

    #[test]
    fn test_repeated_reporter_yields_one_claim() {
        let claims = vec![
            Claim::pending(ClaimKind::Reporter, "HC 161.450", "Gilmar Mendes"),
            Claim::pending(ClaimKind::Article, "HC 161.450", "art. 5º"),
            Claim::pending(ClaimKind::Reporter, "HC 161.450", "gilmar mendes"),
        ];

        let deduped = dedup_claims(claims);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].value, "Gilmar Mendes");
    }

    #[test]
    fn test_same_value_different_case_is_kept() {
        let claims = vec![
            Claim::pending(ClaimKind::Reporter, "HC 161.450", "Gilmar Mendes"),
            Claim::pending(ClaimKind::Reporter, "RE 1.513.210", "Gilmar Mendes"),
        ];
        assert_eq!(dedup_claims(claims).len(), 2);
    }
}
