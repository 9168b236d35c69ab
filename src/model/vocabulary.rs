//! Jurisdiction vocabulary used by the claim extractor and the negation detector
//!
//! Every hand-maintained word list lives here as data. The defaults target
//! Brazilian Supreme Court (STF) answers written in Portuguese; any table can be
//! replaced from the `vocabulary` section of the YAML config file.

use serde::Deserialize;

/// Case-class abbreviations that prefix a docket number (e.g. "HC 161.450")
const CASE_CLASSES: &[&str] = &["HC", "RE", "RHC", "ADI", "ADPF", "MS", "AgR", "ED", "ARE"];

/// Words introducing the name of the reporting justice
const REPORTER_ROLES: &[&str] = &["relator", "relatora", "ministro", "ministra"];

/// Abbreviated honorifics, matched with their trailing period
const HONORIFICS: &[&str] = &["Min."];

/// Lowercase particles allowed between capitalized name tokens
const NAME_PARTICLES: &[&str] = &["de", "da", "do", "dos", "das"];

/// Clause qualifiers that may follow an article number
const CLAUSE_QUALIFIERS: &[&str] = &["inciso", "inc.", "§", "parágrafo"];

/// Code suffixes that may close an article citation ("do CP", "da CF/88")
const CODE_SUFFIXES: &[&str] = &[
    "CF/88",
    "CF",
    "CPP",
    "CP",
    "Constituição Federal",
    "Constituição",
];

/// Words introducing a quoted theme description
const THEME_INDICATORS: &[&str] = &["tema", "temas"];

/// Surface patterns asserting that information does not exist (regex syntax)
const ABSENCE_PATTERNS: &[&str] = &[
    r"não consta",
    r"não há registro",
    r"não encontr",
    r"não foram encontrad",
    r"não exist",
    r"não possui",
    r"nenhuma decisão",
    r"nenhum registro",
    r"não consta nas \d+ decisões",
];

/// Closed-class words and generic domain nouns ignored when probing for absence
const STOP_WORDS: &[&str] = &[
    "quais", "qual", "que", "como", "onde", "quando", "decisões", "decisão", "decisoes",
    "decisao", "sobre", "citam", "cita", "tratam", "trata", "são", "sao", "foram", "pode",
    "podem", "tem", "têm", "dos", "das", "do", "da", "de", "em", "no", "na", "nos", "nas",
    "com", "por", "para", "uma", "um", "os", "as", "se", "ou", "ao", "aos", "à", "às", "o",
    "a", "e", "é", "uso", "tema", "falam", "fala",
];

/// Domain terms and their variants; expansion works in both directions
const SYNONYMS: &[(&str, &[&str])] = &[
    ("maconha", &["cannabis", "canábis", "marijuana", "cânhamo"]),
    ("cannabis", &["maconha", "canábis", "marijuana", "cânhamo"]),
    (
        "medicinal",
        &["medicinais", "médico", "médica", "terapêutico", "terapêutica"],
    ),
    (
        "medicinais",
        &["medicinal", "médico", "médica", "terapêutico", "terapêutica"],
    ),
    ("cultivo", &["plantio", "plantar", "cultivar", "plantação"]),
    ("drogas", &["entorpecentes", "narcóticos", "substâncias"]),
    ("saúde", &["sanitário", "sanitária", "médico", "médica"]),
    ("penal", &["criminal", "crime", "criminoso", "delito"]),
    ("preso", &["presa", "prisão", "detido", "detida", "encarcerado"]),
    ("liberdade", &["soltura", "solto", "livre", "liberação"]),
];

/// One entry of the synonym table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynonymEntry {
    pub term: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Vocabulary tables driving extraction and negation probing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub case_classes: Vec<String>,
    pub reporter_roles: Vec<String>,
    pub honorifics: Vec<String>,
    pub name_particles: Vec<String>,
    pub clause_qualifiers: Vec<String>,
    pub code_suffixes: Vec<String>,
    pub theme_indicators: Vec<String>,
    pub absence_patterns: Vec<String>,
    pub stop_words: Vec<String>,
    pub synonyms: Vec<SynonymEntry>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            case_classes: owned(CASE_CLASSES),
            reporter_roles: owned(REPORTER_ROLES),
            honorifics: owned(HONORIFICS),
            name_particles: owned(NAME_PARTICLES),
            clause_qualifiers: owned(CLAUSE_QUALIFIERS),
            code_suffixes: owned(CODE_SUFFIXES),
            theme_indicators: owned(THEME_INDICATORS),
            absence_patterns: owned(ABSENCE_PATTERNS),
            stop_words: owned(STOP_WORDS),
            synonyms: SYNONYMS
                .iter()
                .map(|(term, variants)| SynonymEntry {
                    term: (*term).to_string(),
                    variants: owned(variants),
                })
                .collect(),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
