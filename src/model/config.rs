use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::vocabulary::VocabularyConfig;

const ENV_CONFIG_PATH: &str = "KG_CHECKER_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_NEO4J_URI: &str = "NEO4J_URI";
const ENV_NEO4J_USERNAME: &str = "NEO4J_USERNAME";
const ENV_NEO4J_PASSWORD: &str = "NEO4J_PASSWORD";
const ENV_NEO4J_DATABASE: &str = "NEO4J_DATABASE";
const ENV_GRAPH_TIMEOUT_SECS: &str = "GRAPH_TIMEOUT_SECS";
const ENV_GRAPH_FIXTURE_PATH: &str = "GRAPH_FIXTURE_PATH";
const ENV_QUALITY_LOG_PATH: &str = "QUALITY_LOG_PATH";

const DEFAULT_NEO4J_URI: &str = "http://localhost:7474";
const DEFAULT_NEO4J_USERNAME: &str = "neo4j";
const DEFAULT_NEO4J_DATABASE: &str = "neo4j";
const DEFAULT_GRAPH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_QUALITY_LOG_PATH: &str = "logs/quality_log.jsonl";

/// Heuristic thresholds and limits of the deterministic checker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Minimum length of an expanded question token for substring matching
    /// against theme tokens during negation probing
    pub min_substring_len: usize,
    /// Minimum number of shared tokens for a theme description to match
    pub min_shared_tokens: usize,
    /// Question tokens must be longer than this to count as keywords
    pub min_keyword_len: usize,
    /// Upper bound on concurrent graph lookups during one verification pass
    pub max_concurrent_lookups: usize,
    /// Deadline for one whole verification pass
    pub verification_timeout_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            min_substring_len: 4,
            min_shared_tokens: 2,
            min_keyword_len: 2,
            max_concurrent_lookups: 8,
            verification_timeout_secs: 30,
        }
    }
}

impl CheckerConfig {
    pub fn verification_timeout(&self) -> Duration {
        Duration::from_secs(self.verification_timeout_secs)
    }
}

/// Connection settings for the Neo4j HTTP endpoint
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password: Option<String>,
    pub database: String,
    pub timeout: Duration,
    /// When set, the graph is served from this JSON fixture instead of Neo4j
    pub fixture_path: Option<PathBuf>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_NEO4J_URI.to_string(),
            username: DEFAULT_NEO4J_USERNAME.to_string(),
            password: None,
            database: DEFAULT_NEO4J_DATABASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_GRAPH_TIMEOUT_SECS),
            fixture_path: None,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub checker: CheckerConfig,
    pub vocabulary: VocabularyConfig,
    pub graph: GraphConfig,
    pub quality_log_path: PathBuf,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checker: CheckerConfig::default(),
            vocabulary: VocabularyConfig::default(),
            graph: GraphConfig::default(),
            quality_log_path: PathBuf::from(DEFAULT_QUALITY_LOG_PATH),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let graph = GraphConfig {
            uri: std::env::var(ENV_NEO4J_URI).unwrap_or_else(|_| DEFAULT_NEO4J_URI.to_string()),
            username: std::env::var(ENV_NEO4J_USERNAME)
                .unwrap_or_else(|_| DEFAULT_NEO4J_USERNAME.to_string()),
            password: std::env::var(ENV_NEO4J_PASSWORD).ok(),
            database: std::env::var(ENV_NEO4J_DATABASE)
                .unwrap_or_else(|_| DEFAULT_NEO4J_DATABASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var(ENV_GRAPH_TIMEOUT_SECS)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_GRAPH_TIMEOUT_SECS),
            ),
            fixture_path: std::env::var(ENV_GRAPH_FIXTURE_PATH).ok().map(PathBuf::from),
        };

        let quality_log_path = std::env::var(ENV_QUALITY_LOG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_QUALITY_LOG_PATH));

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            checker: file.checker,
            vocabulary: file.vocabulary,
            graph,
            quality_log_path,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config file, using defaults"
                        );
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read config file, using defaults"
                );
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
