//! Literal reference extraction
//!
//! Every pattern is compiled from [`VocabularyConfig`] so the word lists stay
//! data. Offsets handed out by this module are character offsets, not bytes.

use regex::{Captures, Regex};

use super::error::PatternError;
use crate::model::{ClaimKind, VocabularyConfig};

/// Maximum number of characters between a theme indicator and its opening quote
const THEME_WINDOW: usize = 40;

/// One case identifier and every place it occurs in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMention {
    /// Normalized identifier, e.g. "HC 161.450"
    pub id: String,
    /// Character offsets of each occurrence, ascending
    pub offsets: Vec<usize>,
}

/// A reporter, article or theme reference awaiting association with a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ClaimKind,
    pub text: String,
    pub offset: usize,
}

/// Compiled extraction patterns
pub struct EntityPatterns {
    case_pattern: Regex,
    reporter_pattern: Regex,
    article_pattern: Regex,
    theme_pattern: Regex,
}

impl EntityPatterns {
    pub fn new(vocab: &VocabularyConfig) -> Result<Self, PatternError> {
        let classes = alternation("case_classes", &vocab.case_classes)?;
        let case_pattern = compile(
            "case_classes",
            &format!(r"(?i)\b(?P<class>{classes})\s*(?P<docket>\d+(?:\.\d+)*(?:/[A-Z]{{2}})?)\b"),
        )?;

        let roles = alternation("reporter_roles", &vocab.reporter_roles)?;
        let lead = if vocab.honorifics.is_empty() {
            format!(r"(?i:\b(?:{roles})\b)")
        } else {
            let honorifics = alternation("honorifics", &vocab.honorifics)?;
            format!(r"(?:(?i:\b(?:{roles})\b)|\b(?:{honorifics}))")
        };
        let token = r"\p{Lu}\p{Ll}+";
        let particle = if vocab.name_particles.is_empty() {
            String::new()
        } else {
            format!(
                r"(?:(?:{})\s+)?",
                alternation("name_particles", &vocab.name_particles)?
            )
        };
        let reporter_pattern = compile(
            "reporter_roles",
            &format!(
                r"{lead}(?:\s*[:,]?\s*{lead})*\s*[:,]?\s*(?P<name>{token}(?:\s+{particle}{token}){{1,4}})"
            ),
        )?;

        let qualifier = if vocab.clause_qualifiers.is_empty() {
            String::new()
        } else {
            format!(
                r"(?:{})?\s*",
                alternation("clause_qualifiers", &vocab.clause_qualifiers)?
            )
        };
        let suffix = if vocab.code_suffixes.is_empty() {
            String::new()
        } else {
            format!(
                r"(?:\s*,?\s*\b(?:do|da|dos|das)\s+(?:{})\b)?",
                alternation("code_suffixes", &vocab.code_suffixes)?
            )
        };
        let article_pattern = compile(
            "clause_qualifiers",
            &format!(
                r"(?i)\bart\.?\s*\d+[º°]?(?:\s*,?\s*{qualifier}(?-i:[IVXLCDM]+|\d+)\b)?{suffix}"
            ),
        )?;

        let indicators = alternation("theme_indicators", &vocab.theme_indicators)?;
        let theme_pattern = compile(
            "theme_indicators",
            &format!(
                r#"(?i)\b(?:{indicators})\b[^"“”\n]{{0,{THEME_WINDOW}}}["“](?P<description>[^"“”\n]+)["”]"#
            ),
        )?;

        Ok(Self {
            case_pattern,
            reporter_pattern,
            article_pattern,
            theme_pattern,
        })
    }

    /// Case identifiers in order of first appearance
    pub fn case_mentions(&self, text: &str) -> Vec<CaseMention> {
        let mut mentions: Vec<CaseMention> = Vec::new();

        for caps in self.case_pattern.captures_iter(text) {
            let (Some(whole), Some(class), Some(docket)) =
                (caps.get(0), caps.name("class"), caps.name("docket"))
            else {
                continue;
            };
            let id = format!(
                "{} {}",
                class.as_str().to_uppercase(),
                docket.as_str().to_uppercase()
            );
            let offset = char_offset(text, whole.start());

            match mentions.iter_mut().find(|m| m.id == id) {
                Some(mention) => mention.offsets.push(offset),
                None => mentions.push(CaseMention {
                    id,
                    offsets: vec![offset],
                }),
            }
        }

        mentions
    }

    /// Reporter, article and theme references ordered by offset
    pub fn references(&self, text: &str) -> Vec<Reference> {
        let mut references: Vec<Reference> = Vec::new();

        references.extend(
            self.reporter_pattern
                .captures_iter(text)
                .filter_map(|caps| capture(text, &caps, "name", ClaimKind::Reporter)),
        );
        references.extend(self.article_pattern.find_iter(text).map(|m| Reference {
            kind: ClaimKind::Article,
            text: m.as_str().trim().to_string(),
            offset: char_offset(text, m.start()),
        }));
        references.extend(
            self.theme_pattern
                .captures_iter(text)
                .filter_map(|caps| capture(text, &caps, "description", ClaimKind::Theme)),
        );

        // stable: same-offset references keep reporter, article, theme order
        references.sort_by_key(|r| r.offset);
        references
    }
}

fn capture(text: &str, caps: &Captures<'_>, group: &str, kind: ClaimKind) -> Option<Reference> {
    let whole = caps.get(0)?;
    let value = caps.name(group)?.as_str().trim();
    if value.is_empty() {
        return None;
    }
    Some(Reference {
        kind,
        text: value.to_string(),
        offset: char_offset(text, whole.start()),
    })
}

/// Escaped alternation, longest words first so "RHC" wins over "RE"
fn alternation(table: &'static str, words: &[String]) -> Result<String, PatternError> {
    let mut words: Vec<&str> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Err(PatternError::EmptyTable(table));
    }
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));

    Ok(words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|"))
}

fn compile(table: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::Invalid { table, source })
}

pub(crate) fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> EntityPatterns {
        EntityPatterns::new(&VocabularyConfig::default()).unwrap()
    }

    #[test]
    fn test_case_ids_are_normalized() {
        let mentions = patterns().case_mentions("Ver hc161.450, o RE 1.513.210 e o HC  161.450.");

        let ids: Vec<&str> = mentions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["HC 161.450", "RE 1.513.210"]);
        assert_eq!(mentions[0].offsets.len(), 2);
    }

    #[test]
    fn test_case_with_jurisdiction_suffix() {
        let mentions = patterns().case_mentions("No ARE 1.234/SP o tribunal decidiu.");
        assert_eq!(mentions[0].id, "ARE 1.234/SP");
    }

    #[test]
    fn test_longer_class_wins() {
        let mentions = patterns().case_mentions("O RHC 265.270 foi provido.");
        assert_eq!(mentions[0].id, "RHC 265.270");
    }

    #[test]
    fn test_reporter_with_role_and_colon() {
        let refs = patterns().references("Relator: Gilmar Mendes. Outro trecho.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ClaimKind::Reporter);
        assert_eq!(refs[0].text, "Gilmar Mendes");
        assert_eq!(refs[0].offset, 0);
    }

    #[test]
    fn test_reporter_with_particle_and_chained_roles() {
        let refs = patterns().references("relator o Ministro Alexandre de Moraes votou");
        let names: Vec<&str> = refs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(names, vec!["Alexandre de Moraes"]);

        let refs = patterns().references("Min. Cármen Lúcia");
        assert_eq!(refs[0].text, "Cármen Lúcia");
    }

    #[test]
    fn test_conjunction_ends_the_name() {
        let refs = patterns().references("relator Gilmar Mendes e Cármen Lúcia");
        let names: Vec<&str> = refs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(names, vec!["Gilmar Mendes"]);
    }

    #[test]
    fn test_single_name_token_is_not_a_reporter() {
        assert!(patterns().references("O relator Fachin votou").is_empty());
    }

    #[test]
    fn test_article_variants() {
        let refs = patterns().references("Cita o art. 5º, inciso XXXV, da CF/88 e o art 33 e art.28.");
        let texts: Vec<&str> = refs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["art. 5º, inciso XXXV, da CF/88", "art 33", "art.28"]);
    }

    #[test]
    fn test_theme_description_in_quotes() {
        let refs = patterns().references(r#"Trata do Tema 506, "uso medicinal de canábis"."#);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ClaimKind::Theme);
        assert_eq!(refs[0].text, "uso medicinal de canábis");
    }

    #[test]
    fn test_offsets_count_characters() {
        let refs = patterns().references("Decisão: art. 5");
        assert_eq!(refs[0].offset, 9);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let vocab = VocabularyConfig {
            case_classes: Vec::new(),
            ..VocabularyConfig::default()
        };
        assert!(matches!(
            EntityPatterns::new(&vocab),
            Err(PatternError::EmptyTable("case_classes"))
        ));
    }
}
