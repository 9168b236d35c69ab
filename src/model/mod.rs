pub mod claims;
pub mod config;
pub mod quality;
pub mod vocabulary;

pub use claims::{
    Agreement, AgreementLevel, CheckerResult, Claim, ClaimKind, NO_SUBJECT, ScoreComparison,
};
pub use config::{CheckerConfig, Config, GraphConfig};
pub use quality::{QualityLogEntry, QualityMetrics, QualityReport};
pub use vocabulary::VocabularyConfig;
