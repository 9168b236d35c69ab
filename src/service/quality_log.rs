//! Append-only JSONL quality log
//!
//! Every processed question adds one line. Lines are never rewritten; readers
//! skip whatever they cannot parse.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fd_lock::RwLock;
use thiserror::Error;

use crate::model::{QualityLogEntry, QualityReport};

const LOCK_ATTEMPTS: u32 = 5;
const LOCK_BASE_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum QualityLogError {
    #[error("Quality log I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Quality log is locked by another writer after {attempts} attempts")]
    Contended { attempts: u32 },
}

/// JSONL file of processed questions, shared by concurrent writers through an advisory lock
#[derive(Debug, Clone)]
pub struct QualityLog {
    path: PathBuf,
    attempts: u32,
    base_delay: Duration,
}

impl QualityLog {
    /// Log at `path`; the file and its parent directories are created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attempts: LOCK_ATTEMPTS,
            base_delay: LOCK_BASE_DELAY,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single newline-terminated line under an exclusive lock
    pub fn append(&self, entry: &QualityLogEntry) -> Result<(), QualityLogError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut lock = RwLock::new(file);

        let mut delay = self.base_delay;
        for attempt in 1..=self.attempts {
            match lock.try_write() {
                Ok(mut guard) => {
                    guard.write_all(line.as_bytes())?;
                    guard.flush()?;
                    tracing::debug!(
                        path = %self.path.display(),
                        attempt,
                        "Appended quality log entry"
                    );
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if attempt < self.attempts {
                        std::thread::sleep(delay);
                        delay *= 2;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(QualityLogError::Contended {
            attempts: self.attempts,
        })
    }

    /// Every parseable entry in file order; a missing file is an empty log
    pub fn load(&self) -> Result<Vec<QualityLogEntry>, QualityLogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<QualityLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping malformed quality log line"
                ),
            }
        }

        Ok(entries)
    }

    /// The most recent `limit` entries, oldest first; all of them without a limit
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<QualityLogEntry>, QualityLogError> {
        let mut entries = self.load()?;
        if let Some(limit) = limit
            && entries.len() > limit
        {
            entries.drain(..entries.len() - limit);
        }
        Ok(entries)
    }

    pub fn report(&self) -> Result<QualityReport, QualityLogError> {
        Ok(summarize(&self.load()?))
    }
}

/// Aggregate statistics over a set of entries
pub fn summarize(entries: &[QualityLogEntry]) -> QualityReport {
    if entries.is_empty() {
        return QualityReport::default();
    }

    let scores: Vec<f64> = entries.iter().map(|e| e.metrics.fidelity_score).collect();
    let checker_scores: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.checker.as_ref().map(|c| c.score))
        .collect();

    QualityReport {
        entries: entries.len(),
        mean_fidelity_score: scores.iter().sum::<f64>() / scores.len() as f64,
        min_fidelity_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
        max_fidelity_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        total_claims: entries.iter().map(|e| e.metrics.total_claims).sum(),
        confirmed_claims: entries.iter().map(|e| e.metrics.confirmed_claims).sum(),
        unfounded_claims: entries.iter().map(|e| e.metrics.unfounded_claims).sum(),
        validated_entries: entries.iter().filter(|e| e.metrics.validated).count(),
        checked_entries: checker_scores.len(),
        mean_checker_score: (!checker_scores.is_empty())
            .then(|| checker_scores.iter().sum::<f64>() / checker_scores.len() as f64),
    }
}

/// Multi-line text form of the aggregate report
pub fn render_report(report: &QualityReport) -> String {
    if report.entries == 0 {
        return "No entries in the quality log.".to_string();
    }

    let rule = "=".repeat(60);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "AGGREGATE QUALITY REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  {:<30}{}", "Questions analyzed:", report.entries);
    let _ = writeln!(out, "  {:<30}{:.1}%", "Mean fidelity score:", report.mean_fidelity_score);
    let _ = writeln!(out, "  {:<30}{:.1}%", "Minimum score:", report.min_fidelity_score);
    let _ = writeln!(out, "  {:<30}{:.1}%", "Maximum score:", report.max_fidelity_score);
    let _ = writeln!(out, "  {:<30}{}", "Total claims:", report.total_claims);
    let _ = writeln!(out, "  {:<30}{}", "Confirmed claims:", report.confirmed_claims);
    let _ = writeln!(out, "  {:<30}{}", "Unfounded claims:", report.unfounded_claims);
    let _ = writeln!(
        out,
        "  {:<30}{}/{}",
        "Validated questions:", report.validated_entries, report.entries
    );
    if let Some(mean) = report.mean_checker_score {
        let _ = writeln!(
            out,
            "  {:<30}{:.1}% over {} questions",
            "Mean checker score:", mean, report.checked_entries
        );
    }
    out.push_str(&rule);
    out
}
