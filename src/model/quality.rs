use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::claims::CheckerResult;

/// Self-reported assessment produced by the reviewer model
///
/// Parsed from free text, never generated here. The counters are trusted as
/// reported and are not reconciled with `fidelity_score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct QualityMetrics {
    #[serde(alias = "validado")]
    pub validated: bool,
    #[serde(alias = "score_fidelidade")]
    pub fidelity_score: f64,
    #[serde(alias = "total_afirmacoes")]
    pub total_claims: u64,
    #[serde(alias = "verificadas_ok")]
    pub confirmed_claims: u64,
    #[serde(alias = "sem_fundamentacao")]
    pub unfounded_claims: u64,
    #[serde(alias = "processos_verificados")]
    pub cases_checked: Vec<String>,
    #[serde(alias = "problemas")]
    pub issues: Vec<String>,
}

/// One line of the quality log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QualityLogEntry {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub query: String,
    #[serde(default)]
    pub metrics: QualityMetrics,
    #[serde(default)]
    pub analyst_chars: usize,
    #[serde(default)]
    pub reviewer_chars: usize,
    /// Checker results in an unrecognized shape are dropped, not fatal to the entry
    #[serde(
        default,
        deserialize_with = "deserialize_checker",
        skip_serializing_if = "Option::is_none"
    )]
    pub checker: Option<CheckerResult>,
}

impl QualityLogEntry {
    /// Build an entry for a question processed now
    pub fn new(
        query: &str,
        metrics: QualityMetrics,
        analyst_text: &str,
        reviewer_text: &str,
        checker: Option<CheckerResult>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            query: query.to_string(),
            metrics,
            analyst_chars: analyst_text.chars().count(),
            reviewer_chars: reviewer_text.chars().count(),
            checker,
        }
    }
}

/// RFC 3339, or a naive ISO 8601 timestamp read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

fn deserialize_checker<'de, D>(deserializer: D) -> Result<Option<CheckerResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Aggregate statistics over the whole quality log
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct QualityReport {
    pub entries: usize,
    pub mean_fidelity_score: f64,
    pub min_fidelity_score: f64,
    pub max_fidelity_score: f64,
    pub total_claims: u64,
    pub confirmed_claims: u64,
    pub unfounded_claims: u64,
    pub validated_entries: usize,
    /// Entries carrying an embedded checker result
    pub checked_entries: usize,
    /// Mean checker score over `checked_entries`
    pub mean_checker_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_accept_reviewer_field_names() {
        let json = r#"{"validado": true, "score_fidelidade": 87.5, "total_afirmacoes": 8,
            "verificadas_ok": 7, "sem_fundamentacao": 1,
            "processos_verificados": ["HC 161.450"], "problemas": ["relator incorreto"]}"#;
        let metrics: QualityMetrics = serde_json::from_str(json).unwrap();

        assert!(metrics.validated);
        assert_eq!(metrics.fidelity_score, 87.5);
        assert_eq!(metrics.total_claims, 8);
        assert_eq!(metrics.confirmed_claims, 7);
        assert_eq!(metrics.unfounded_claims, 1);
        assert_eq!(metrics.cases_checked, vec!["HC 161.450"]);
        assert_eq!(metrics.issues, vec!["relator incorreto"]);
    }

    #[test]
    fn test_entry_ignores_unknown_fields() {
        let line = r#"{"timestamp": "2026-01-10T12:00:00Z", "query": "q", "future_field": 1}"#;
        let entry: QualityLogEntry = serde_json::from_str(line).unwrap();

        assert_eq!(entry.query, "q");
        assert_eq!(entry.metrics, QualityMetrics::default());
        assert!(entry.checker.is_none());
    }

    #[test]
    fn test_naive_timestamps_are_read_as_utc() {
        let line = r#"{"timestamp": "2026-01-10T12:00:00.123456", "query": "q"}"#;
        let entry: QualityLogEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2026-01-10T12:00:00.123456+00:00");

        let bad = r#"{"timestamp": "ontem", "query": "q"}"#;
        assert!(serde_json::from_str::<QualityLogEntry>(bad).is_err());
    }

    #[test]
    fn test_foreign_checker_shape_is_dropped() {
        let line = r#"{"timestamp": "2026-01-10T12:00:00Z", "query": "q",
            "checker": {"total_claims": 2, "verificados_ok": 1}}"#;
        let entry: QualityLogEntry = serde_json::from_str(line).unwrap();
        assert!(entry.checker.is_none());
    }

    #[test]
    fn test_checker_with_inconsistent_claim_is_dropped() {
        let line = r#"{"timestamp": "2026-01-10T12:00:00Z", "query": "q",
            "checker": {"total": 1, "confirmed_count": 1, "unconfirmed_count": 0, "score": 100.0,
                "claims": [{"kind": "reporter", "subject_case": "HC 1", "value": "X",
                    "verified": false, "confirmed": true}]}}"#;
        let entry: QualityLogEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.query, "q");
        assert!(entry.checker.is_none());
    }

    #[test]
    fn test_entry_counts_characters_not_bytes() {
        let entry = QualityLogEntry::new("q", QualityMetrics::default(), "decisão", "", None);
        assert_eq!(entry.analyst_chars, 7);
        assert_eq!(entry.reviewer_chars, 0);
    }
}
