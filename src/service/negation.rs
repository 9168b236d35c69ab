//! Detection and verification of absence claims
//!
//! When an answer says nothing was found, the question's keywords are probed
//! against every theme in the graph. A hit means the answer's denial is wrong.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::graph::{GraphClient, GraphError, Params, Statement, field};
use crate::model::{CheckerConfig, Claim, ClaimKind, NO_SUBJECT, VocabularyConfig};
use crate::service::claims::PatternError;

/// Recognizes answers that deny something exists and checks the denial against the graph
pub struct NegationDetector {
    absence_pattern: Regex,
    token_pattern: Regex,
    stop_words: HashSet<String>,
    synonyms: HashMap<String, HashSet<String>>,
    min_keyword_len: usize,
    min_substring_len: usize,
}

impl NegationDetector {
    /// Compile the absence phrases and index synonyms in both directions
    pub fn new(vocab: &VocabularyConfig, checker: &CheckerConfig) -> Result<Self, PatternError> {
        if vocab.absence_patterns.is_empty() {
            return Err(PatternError::EmptyTable("absence_patterns"));
        }
        let absence_pattern = Regex::new(&format!(
            "(?i)(?:{})",
            vocab.absence_patterns.join("|")
        ))
        .map_err(|source| PatternError::Invalid {
            table: "absence_patterns",
            source,
        })?;
        let token_pattern = Regex::new(r"\w+").map_err(|source| PatternError::Invalid {
            table: "tokens",
            source,
        })?;

        // both directions: term -> variants, variant -> term
        let mut synonyms: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in &vocab.synonyms {
            let term = entry.term.to_lowercase();
            for variant in &entry.variants {
                let variant = variant.to_lowercase();
                synonyms
                    .entry(term.clone())
                    .or_default()
                    .insert(variant.clone());
                synonyms.entry(variant).or_default().insert(term.clone());
            }
        }

        Ok(Self {
            absence_pattern,
            token_pattern,
            stop_words: vocab.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            synonyms,
            min_keyword_len: checker.min_keyword_len,
            min_substring_len: checker.min_substring_len,
        })
    }

    /// Whether the answer asserts that something does not exist
    pub fn asserts_absence(&self, answer: &str) -> bool {
        self.absence_pattern.is_match(answer)
    }

    fn tokens(&self, text: &str) -> HashSet<String> {
        self.token_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    /// Question keywords expanded with their synonyms
    pub fn keywords(&self, question: &str) -> HashSet<String> {
        let base: Vec<String> = self
            .tokens(question)
            .into_iter()
            .filter(|t| t.chars().count() > self.min_keyword_len && !self.stop_words.contains(t))
            .collect();

        let mut expanded: HashSet<String> = base.iter().cloned().collect();
        for keyword in &base {
            if let Some(variants) = self.synonyms.get(keyword) {
                expanded.extend(variants.iter().cloned());
            }
        }
        expanded
    }

    /// Whether a theme description shares a keyword with the question
    pub fn matches_theme(&self, keywords: &HashSet<String>, description: &str) -> bool {
        let theme_tokens = self.tokens(description);

        if !keywords.is_disjoint(&theme_tokens) {
            return true;
        }

        keywords
            .iter()
            .filter(|k| k.chars().count() >= self.min_substring_len)
            .any(|k| {
                theme_tokens
                    .iter()
                    .any(|t| t.contains(k.as_str()) || k.contains(t.as_str()))
            })
    }

    /// Produce resolved negation claims, or nothing when the answer denies nothing
    pub async fn probe(
        &self,
        graph: &dyn GraphClient,
        answer: &str,
        question: &str,
    ) -> Result<Vec<Claim>, GraphError> {
        if !self.asserts_absence(answer) {
            return Ok(Vec::new());
        }

        let keywords = self.keywords(question);
        let rows = graph.query(Statement::AllThemes, Params::new()).await?;

        let claims: Vec<Claim> = rows
            .iter()
            .filter_map(|row| Some((field(row, "processo")?, field(row, "tema")?)))
            .filter(|(_, theme)| self.matches_theme(&keywords, theme))
            .map(|(case, theme)| {
                Claim::resolved(
                    ClaimKind::Negation,
                    case,
                    format!("Answer denied existence, but graph has: {}", theme),
                    false,
                )
            })
            .collect();

        tracing::debug!(
            keywords = keywords.len(),
            themes_scanned = rows.len(),
            contradictions = claims.len(),
            "Probed graph for denied information"
        );

        if claims.is_empty() {
            return Ok(vec![Claim::resolved(
                ClaimKind::Negation,
                NO_SUBJECT,
                "Answer denied existence; graph confirms absence",
                true,
            )]);
        }

        Ok(claims)
    }
}
