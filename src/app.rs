//! Application state and service initialization
//!
//! Builds the graph backend and the services on top of it once, so handlers
//! and tests share the same wiring.

use std::sync::Arc;

use crate::graph::{GraphClient, InMemoryGraph, Neo4jHttpClient};
use crate::model::Config;
use crate::service::claims::PatternError;
use crate::service::{DeterministicChecker, MetricsParser, QualityLog, QualityService};

/// Application state shared by all handlers
pub struct AppState {
    /// Knowledge graph backend
    pub graph: Arc<dyn GraphClient>,
    /// Checker, reviewer parsing and quality log
    pub quality: Arc<QualityService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// The graph comes from the fixture at `GRAPH_FIXTURE_PATH` when set,
    /// otherwise from the Neo4j HTTP endpoint.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let graph: Arc<dyn GraphClient> = match &config.graph.fixture_path {
            Some(path) => Arc::new(
                InMemoryGraph::from_file(path).map_err(|e| AppError::GraphInit(e.to_string()))?,
            ),
            None => Arc::new(
                Neo4jHttpClient::new(&config.graph)
                    .map_err(|e| AppError::GraphInit(e.to_string()))?,
            ),
        };

        Self::with_graph(config, graph)
    }

    /// Build the services on top of an already constructed graph backend
    pub fn with_graph(config: &Config, graph: Arc<dyn GraphClient>) -> Result<Self, AppError> {
        let checker =
            DeterministicChecker::new(Arc::clone(&graph), &config.checker, &config.vocabulary)?;
        let parser = MetricsParser::new().map_err(|e| AppError::InvalidConfig(e.to_string()))?;
        let log = QualityLog::new(config.quality_log_path.clone());

        let quality = QualityService::new(Arc::new(checker), Arc::new(parser), log);

        Ok(Self {
            graph,
            quality: Arc::new(quality),
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Graph backend could not be set up
    #[error("Graph initialization failed: {0}")]
    GraphInit(String),

    /// Vocabulary produced an unusable pattern
    #[error("Invalid vocabulary: {0}")]
    Vocabulary(#[from] PatternError),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
