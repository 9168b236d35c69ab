//! Neo4j client over the HTTP transactional endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{GraphClient, GraphError, Params, Record, Statement};
use crate::model::GraphConfig;

#[derive(Debug, Serialize)]
struct CommitRequest<'a> {
    statements: Vec<StatementRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    parameters: &'a Params,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

/// Client for a Neo4j server's `/db/{name}/tx/commit` endpoint
pub struct Neo4jHttpClient {
    client: Client,
    commit_url: Url,
    username: String,
    password: Option<String>,
}

impl Neo4jHttpClient {
    /// Build the HTTP client with the configured per-request timeout
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        let commit_url = Url::parse(&format!(
            "{}/db/{}/tx/commit",
            config.uri.trim_end_matches('/'),
            config.database
        ))
        .map_err(|e| GraphError::InvalidUri(format!("{}: {}", config.uri, e)))?;

        let client = Client::builder().timeout(config.timeout).build()?;

        tracing::info!(url = %commit_url, "Neo4j HTTP client configured");

        Ok(Self {
            client,
            commit_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl GraphClient for Neo4jHttpClient {
    async fn query(&self, statement: Statement, params: Params) -> Result<Vec<Record>, GraphError> {
        let body = CommitRequest {
            statements: vec![StatementRequest {
                statement: statement.cypher(),
                parameters: &params,
            }],
        };

        tracing::debug!(statement = ?statement, params = ?params, "Running graph query");

        let response = self
            .client
            .post(self.commit_url.clone())
            .basic_auth(&self.username, self.password.as_deref())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let commit: CommitResponse = response.json().await.map_err(|e| {
            GraphError::ParseError(format!("Failed to deserialize Neo4j response: {}", e))
        })?;

        rows_to_records(commit)
    }
}

fn rows_to_records(commit: CommitResponse) -> Result<Vec<Record>, GraphError> {
    if let Some(error) = commit.errors.into_iter().next() {
        return Err(GraphError::QueryFailed {
            code: error.code,
            message: error.message,
        });
    }

    let Some(result) = commit.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    let records = result
        .data
        .into_iter()
        .map(|data| {
            result
                .columns
                .iter()
                .cloned()
                .zip(data.row)
                .collect::<Record>()
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_keyed_by_column() {
        let json = r#"{"results":[{"columns":["numero","nome"],
            "data":[{"row":["HC 161.450","Gilmar Mendes"],"meta":[null,null]}]}],"errors":[]}"#;
        let commit: CommitResponse = serde_json::from_str(json).unwrap();
        let records = rows_to_records(commit).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["numero"], "HC 161.450");
        assert_eq!(records[0]["nome"], "Gilmar Mendes");
    }

    #[test]
    fn test_neo4j_errors_are_reported() {
        let json = r#"{"results":[],"errors":[{"code":"Neo.ClientError.Statement.SyntaxError",
            "message":"Invalid input"}]}"#;
        let commit: CommitResponse = serde_json::from_str(json).unwrap();

        match rows_to_records(commit) {
            Err(GraphError::QueryFailed { code, .. }) => {
                assert_eq!(code, "Neo.ClientError.Statement.SyntaxError")
            }
            other => panic!("expected QueryFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_url_includes_database() {
        let config = GraphConfig {
            uri: "http://localhost:7474/".to_string(),
            database: "stf".to_string(),
            ..GraphConfig::default()
        };
        let client = Neo4jHttpClient::new(&config).unwrap();
        assert_eq!(client.commit_url.as_str(), "http://localhost:7474/db/stf/tx/commit");
    }

    #[tokio::test]
    #[ignore] // Requires a running Neo4j server
    async fn test_ping_local_server() {
        let client = Neo4jHttpClient::new(&GraphConfig::default()).unwrap();
        assert!(client.ping().await.is_ok());
    }
}
