//! Extraction of the reviewer's self-reported metrics from free text
//!
//! Three strategies are tried in order: a fenced `quality_metrics` block, any
//! fenced block mentioning the fidelity score, then a bare inline object. The
//! first candidate that parses and coerces wins. Nothing here ever fails; the
//! worst case is `QualityMetrics::default()`.

use regex::Regex;
use serde_json::{Map, Value};

use crate::model::QualityMetrics;

const SCORE_KEYS: &[&str] = &["score_fidelidade", "fidelity_score"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    LabeledBlock,
    FencedBlock,
    Inline,
}

/// Pulls the reviewer's quality metrics out of free text, falling back to defaults
pub struct MetricsParser {
    labeled_block: Regex,
    fenced_block: Regex,
    inline_object: Regex,
}

impl MetricsParser {
    /// Compile the three extraction patterns, most specific first
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            labeled_block: Regex::new(r"(?s)```quality_metrics\s*\n?(.*?)\n?```")?,
            fenced_block: Regex::new(r"(?s)```(?:json)?\s*\n?(\{.*?\})\s*\n?```")?,
            inline_object: Regex::new(
                r#"(?s)(\{\s*"(?:validado|validated)".*?"(?:problemas|issues)"\s*:\s*\[.*?\]\s*\})"#,
            )?,
        })
    }

    pub fn parse(&self, text: &str) -> QualityMetrics {
        for (strategy, candidate) in self.candidates(text) {
            match coerce(candidate.trim()) {
                Some(metrics) => {
                    tracing::debug!(
                        strategy = ?strategy,
                        fidelity_score = metrics.fidelity_score,
                        "Parsed reviewer metrics"
                    );
                    return metrics;
                }
                None => {
                    tracing::debug!(strategy = ?strategy, "Metrics candidate rejected");
                }
            }
        }

        tracing::debug!(
            text_chars = text.chars().count(),
            "No reviewer metrics found, using defaults"
        );
        QualityMetrics::default()
    }

    fn candidates<'t>(&self, text: &'t str) -> Vec<(Strategy, &'t str)> {
        let mut candidates = Vec::new();

        candidates.extend(
            self.labeled_block
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| (Strategy::LabeledBlock, m.as_str())),
        );
        candidates.extend(
            self.fenced_block
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .filter(|m| SCORE_KEYS.iter().any(|k| m.as_str().contains(k)))
                .map(|m| (Strategy::FencedBlock, m.as_str())),
        );
        candidates.extend(
            self.inline_object
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| (Strategy::Inline, m.as_str())),
        );

        candidates
    }
}

fn coerce(candidate: &str) -> Option<QualityMetrics> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;

    Some(QualityMetrics {
        validated: field(object, &["validado", "validated"], as_bool, false)?,
        fidelity_score: field(object, SCORE_KEYS, as_f64, 0.0)?,
        total_claims: field(object, &["total_afirmacoes", "total_claims"], as_u64, 0)?,
        confirmed_claims: field(object, &["verificadas_ok", "confirmed_claims"], as_u64, 0)?,
        unfounded_claims: field(object, &["sem_fundamentacao", "unfounded_claims"], as_u64, 0)?,
        cases_checked: field(
            object,
            &["processos_verificados", "cases_checked"],
            as_strings,
            Vec::new(),
        )?,
        issues: field(object, &["problemas", "issues"], as_strings, Vec::new())?,
    })
}

/// Missing or null fields take the default; present but uncoercible ones reject the candidate
fn field<T>(
    object: &Map<String, Value>,
    keys: &[&str],
    convert: fn(&Value) -> Option<T>,
    default: T,
) -> Option<T> {
    match keys.iter().find_map(|k| object.get(*k).filter(|v| !v.is_null())) {
        Some(value) => convert(value),
        None => Some(default),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "sim" => Some(true),
            "false" | "não" | "nao" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_strings(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}
