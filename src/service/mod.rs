pub mod checker;
pub mod claims;
pub mod metrics_parser;
pub mod negation;
pub mod quality;
pub mod quality_log;
pub mod scoring;
pub mod verification;
pub mod verifier;

pub use checker::{CheckerError, DeterministicChecker};
pub use metrics_parser::MetricsParser;
pub use quality::{QualityOutcome, QualityService};
pub use quality_log::{QualityLog, QualityLogError};
