//! Agreement between verifiers and the human-readable summaries

use std::fmt::Write;

use crate::model::{Agreement, AgreementLevel, Claim, QualityMetrics, ScoreComparison};
use crate::service::verifier::Verification;

const RULE_WIDTH: usize = 55;

/// Compare one primary verification against each of the others
pub fn compare(primary: &Verification, others: &[Verification]) -> Vec<ScoreComparison> {
    let claims: Vec<Claim> = primary
        .checker_result()
        .map(|r| r.claims.clone())
        .unwrap_or_default();

    others
        .iter()
        .map(|other| {
            let difference = (primary.score - other.score).abs();
            ScoreComparison {
                primary: primary.verifier.clone(),
                primary_score: primary.score,
                other: other.verifier.clone(),
                other_score: other.score,
                difference,
                level: AgreementLevel::from_difference(difference),
                claims: claims.clone(),
            }
        })
        .collect()
}

impl From<&ScoreComparison> for Agreement {
    fn from(comparison: &ScoreComparison) -> Self {
        Agreement {
            other_verifier: comparison.other.clone(),
            other_score: comparison.other_score,
            difference: comparison.difference,
            level: comparison.level,
        }
    }
}

fn level_label(level: AgreementLevel) -> &'static str {
    match level {
        AgreementLevel::High => "HIGH (difference <= 10)",
        AgreementLevel::Moderate => "MODERATE (difference <= 25)",
        AgreementLevel::Low => "LOW (difference > 25)",
    }
}

/// Both scores, their difference, the agreement level and every claim
pub fn render_comparison(comparison: &ScoreComparison) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "COMPARISON: {} vs {}", comparison.primary, comparison.other);
    let _ = writeln!(out, "{rule}");
    let primary = format!("{}:", comparison.primary);
    let other = format!("{}:", comparison.other);
    let _ = writeln!(out, "  {:<24}{:.1}%", primary, comparison.primary_score);
    let _ = writeln!(out, "  {:<24}{:.1}%", other, comparison.other_score);
    let _ = writeln!(out, "  {:<24}{:.1}%", "Difference:", comparison.difference);
    let _ = writeln!(out, "  {:<24}{}", "Agreement:", level_label(comparison.level));

    if !comparison.claims.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Claims checked against the graph:");
        for claim in &comparison.claims {
            let marker = if claim.confirmed() { "✓" } else { "✗" };
            let _ = writeln!(
                out,
                "    {} [{:>14}] {}: {}",
                marker,
                claim.kind.as_str(),
                claim.subject_case,
                claim.value
            );
        }
    }

    out.push_str(&rule);
    out
}

/// One-paragraph view of the reviewer's self-reported metrics
pub fn render_metrics_summary(metrics: &QualityMetrics) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let status = if metrics.validated {
        "validated"
    } else {
        "issues found"
    };
    let cases = if metrics.cases_checked.is_empty() {
        "N/A".to_string()
    } else {
        metrics.cases_checked.join(", ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Quality score: {:.1}% ({}/{} claims confirmed)",
        metrics.fidelity_score, metrics.confirmed_claims, metrics.total_claims
    );
    let _ = writeln!(out, "  Status: {status}");
    let _ = writeln!(out, "  Cases checked: {cases}");
    if !metrics.issues.is_empty() {
        let _ = writeln!(out, "  Issues:");
        for issue in &metrics.issues {
            let _ = writeln!(out, "    - {issue}");
        }
    }
    out.push_str(&rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CheckerResult, ClaimKind};
    use crate::service::verifier::Evidence;

    fn checker(score_claims: Vec<Claim>) -> Verification {
        let result = CheckerResult::from_claims(score_claims);
        Verification {
            verifier: "deterministic_checker".to_string(),
            score: result.score,
            evidence: Evidence::Claims(result),
        }
    }

    fn reviewer(score: f64) -> Verification {
        Verification {
            verifier: "reviewer".to_string(),
            score,
            evidence: Evidence::SelfReport(QualityMetrics {
                fidelity_score: score,
                ..QualityMetrics::default()
            }),
        }
    }

    fn eighty_percent() -> Vec<Claim> {
        (0..5)
            .map(|i| {
                let case = format!("HC {i}");
                Claim::resolved(ClaimKind::CaseReference, case.clone(), case, i < 4)
            })
            .collect()
    }

    #[test]
    fn test_agreement_levels() {
        let primary = checker(eighty_percent());
        assert_eq!(primary.score, 80.0);

        let comparisons = compare(&primary, &[reviewer(72.0), reviewer(60.0), reviewer(40.0)]);
        let levels: Vec<AgreementLevel> = comparisons.iter().map(|c| c.level).collect();
        assert_eq!(
            levels,
            vec![AgreementLevel::High, AgreementLevel::Moderate, AgreementLevel::Low]
        );
        assert_eq!(comparisons[0].difference, 8.0);
        assert_eq!(comparisons[0].claims.len(), 5);
    }

    #[test]
    fn test_no_others_no_comparisons() {
        assert!(compare(&checker(Vec::new()), &[]).is_empty());
    }

    #[test]
    fn test_agreement_from_comparison() {
        let comparison = &compare(&checker(eighty_percent()), &[reviewer(60.0)])[0];
        let agreement = Agreement::from(comparison);

        assert_eq!(agreement.other_verifier, "reviewer");
        assert_eq!(agreement.difference, 20.0);
        assert_eq!(agreement.level, AgreementLevel::Moderate);
    }

    #[test]
    fn test_comparison_text_lists_claims() {
        let comparison = &compare(&checker(eighty_percent()), &[reviewer(72.0)])[0];
        let text = render_comparison(comparison);

        assert!(text.contains("80.0%"));
        assert!(text.contains("72.0%"));
        assert!(text.contains("HIGH"));
        assert_eq!(text.matches('✓').count(), 4);
        assert_eq!(text.matches('✗').count(), 1);
    }

    #[test]
    fn test_metrics_summary() {
        let metrics = QualityMetrics {
            fidelity_score: 87.5,
            total_claims: 8,
            confirmed_claims: 7,
            issues: vec!["relator incorreto".to_string()],
            ..QualityMetrics::default()
        };
        let text = render_metrics_summary(&metrics);

        assert!(text.contains("87.5% (7/8 claims confirmed)"));
        assert!(text.contains("issues found"));
        assert!(text.contains("Cases checked: N/A"));
        assert!(text.contains("- relator incorreto"));
    }
}
