//! Read-only access to the decisions knowledge graph
//!
//! Graph:
//!   (:Processo_STF {numero})-[:RELATADO_POR]->(:Ministro_Relator {nome})
//!   (:Processo_STF)-[:TRATA_DE]->(:Tema_Repercussao_Geral {descricao})
//!   (:Processo_STF)-[:CITA_ARTIGO]->(:Artigo_Constitucional {artigo})

mod memory;
mod neo4j;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use memory::{CaseRecord, InMemoryGraph};
pub use neo4j::Neo4jHttpClient;

/// One result row: field name → value
pub type Record = Map<String, Value>;

/// Statement parameters: parameter name → value
pub type Params = Map<String, Value>;

/// Failures talking to or reading from the knowledge graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Graph query failed: {code}: {message}")]
    QueryFailed { code: String, message: String },

    #[error("Unexpected response: {0}")]
    ParseError(String),

    #[error("Invalid graph URI: {0}")]
    InvalidUri(String),

    #[error("Missing statement parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Failed to load graph fixture: {0}")]
    Fixture(String),
}

/// The closed set of lookups the checker issues against the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// Cases whose identifier contains `$case` (case-insensitive)
    CaseByIdentifier,
    /// Reporter names linked to cases matching `$case`
    ReportersOfCase,
    /// Article citations linked to cases matching `$case`
    ArticlesOfCase,
    /// Theme descriptions linked to cases matching `$case`
    ThemesOfCase,
    /// Every (case, theme description) pair
    AllThemes,
    /// Connectivity probe
    Ping,
}

impl Statement {
    pub fn cypher(&self) -> &'static str {
        match self {
            Statement::CaseByIdentifier => {
                "MATCH (p:Processo_STF) WHERE toUpper(p.numero) CONTAINS toUpper($case) \
                 RETURN p.numero AS numero"
            }
            Statement::ReportersOfCase => {
                "MATCH (p:Processo_STF)-[:RELATADO_POR]->(m:Ministro_Relator) \
                 WHERE toUpper(p.numero) CONTAINS toUpper($case) \
                 RETURN p.numero AS numero, m.nome AS nome"
            }
            Statement::ArticlesOfCase => {
                "MATCH (p:Processo_STF)-[:CITA_ARTIGO]->(a:Artigo_Constitucional) \
                 WHERE toUpper(p.numero) CONTAINS toUpper($case) \
                 RETURN p.numero AS numero, a.artigo AS artigo"
            }
            Statement::ThemesOfCase => {
                "MATCH (p:Processo_STF)-[:TRATA_DE]->(t:Tema_Repercussao_Geral) \
                 WHERE toUpper(p.numero) CONTAINS toUpper($case) \
                 RETURN p.numero AS numero, t.descricao AS descricao"
            }
            Statement::AllThemes => {
                "MATCH (p:Processo_STF)-[:TRATA_DE]->(t:Tema_Repercussao_Geral) \
                 RETURN p.numero AS processo, t.descricao AS tema"
            }
            Statement::Ping => "RETURN 1 AS ok",
        }
    }
}

/// Parameters for the per-case statements
pub fn case_params(case: &str) -> Params {
    let mut params = Params::new();
    params.insert("case".to_string(), Value::String(case.to_string()));
    params
}

/// Read a string field from a record, if present
pub fn field<'a>(record: &'a Record, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str)
}

/// Trait for knowledge-graph query backends
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Run a read-only statement and return its rows in order
    async fn query(&self, statement: Statement, params: Params) -> Result<Vec<Record>, GraphError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), GraphError> {
        self.query(Statement::Ping, Params::new()).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_statements_are_parameterized() {
        for statement in [
            Statement::CaseByIdentifier,
            Statement::ReportersOfCase,
            Statement::ArticlesOfCase,
            Statement::ThemesOfCase,
        ] {
            assert!(statement.cypher().contains("$case"), "{:?}", statement);
            assert!(!statement.cypher().contains("MERGE"));
        }
        assert!(!Statement::AllThemes.cypher().contains('$'));
    }

    #[test]
    fn test_field_reads_strings_only() {
        let mut record = Record::new();
        record.insert("nome".to_string(), Value::String("Gilmar Mendes".to_string()));
        record.insert("ok".to_string(), Value::from(1));

        assert_eq!(field(&record, "nome"), Some("Gilmar Mendes"));
        assert_eq!(field(&record, "ok"), None);
        assert_eq!(field(&record, "missing"), None);
    }
}
