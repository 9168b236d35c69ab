//! In-memory graph backend, loaded from a JSON fixture

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{GraphClient, GraphError, Params, Record, Statement};

/// One decision with its one-hop neighbourhood
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseRecord {
    pub number: String,
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
}

impl CaseRecord {
    pub fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            ..Self::default()
        }
    }

    pub fn reporter(mut self, name: &str) -> Self {
        self.reporter = Some(name.to_string());
        self
    }

    pub fn theme(mut self, description: &str) -> Self {
        self.themes.push(description.to_string());
        self
    }

    pub fn article(mut self, citation: &str) -> Self {
        self.articles.push(citation.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    cases: Vec<CaseRecord>,
}

/// Graph held in memory, answering the same statements as Neo4j
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    cases: Vec<CaseRecord>,
}

impl InMemoryGraph {
    pub fn new(cases: Vec<CaseRecord>) -> Self {
        Self { cases }
    }

    /// Load a fixture of the form `{"cases": [{"number": ..., "reporter": ..., ...}]}`
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Fixture(format!("{}: {}", path.display(), e)))?;
        let fixture: Fixture = serde_json::from_str(&contents)
            .map_err(|e| GraphError::Fixture(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            cases = fixture.cases.len(),
            "Loaded in-memory graph fixture"
        );

        Ok(Self::new(fixture.cases))
    }

    fn matching_cases<'a>(&'a self, params: &Params) -> Result<Vec<&'a CaseRecord>, GraphError> {
        let needle = params
            .get("case")
            .and_then(Value::as_str)
            .ok_or(GraphError::MissingParameter("case"))?
            .to_uppercase();

        Ok(self
            .cases
            .iter()
            .filter(|c| c.number.to_uppercase().contains(&needle))
            .collect())
    }
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
        .collect()
}

#[async_trait]
impl GraphClient for InMemoryGraph {
    async fn query(&self, statement: Statement, params: Params) -> Result<Vec<Record>, GraphError> {
        let rows = match statement {
            Statement::CaseByIdentifier => self
                .matching_cases(&params)?
                .into_iter()
                .map(|c| record(&[("numero", &c.number)]))
                .collect(),
            Statement::ReportersOfCase => self
                .matching_cases(&params)?
                .into_iter()
                .filter_map(|c| {
                    c.reporter
                        .as_deref()
                        .map(|nome| record(&[("numero", &c.number), ("nome", nome)]))
                })
                .collect(),
            Statement::ArticlesOfCase => self
                .matching_cases(&params)?
                .into_iter()
                .flat_map(|c| {
                    c.articles
                        .iter()
                        .map(|a| record(&[("numero", &c.number), ("artigo", a)]))
                })
                .collect(),
            Statement::ThemesOfCase => self
                .matching_cases(&params)?
                .into_iter()
                .flat_map(|c| {
                    c.themes
                        .iter()
                        .map(|t| record(&[("numero", &c.number), ("descricao", t)]))
                })
                .collect(),
            Statement::AllThemes => self
                .cases
                .iter()
                .flat_map(|c| {
                    c.themes
                        .iter()
                        .map(|t| record(&[("processo", &c.number), ("tema", t)]))
                })
                .collect(),
            Statement::Ping => vec![Record::new()],
        };

        Ok(rows)
    }
}
