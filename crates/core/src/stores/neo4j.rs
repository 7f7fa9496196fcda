use crate::traits::GraphStore;
use crate::{GraphError, SentenceMatch};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashSet;

const UPSERT_CYPHER: &str = r#"
    MERGE (d:Title {name: $document})
    MERGE (k:Keyword {name: $keyword})
    SET k.sentence = $sentence
    MERGE (d)-[:HAS_KEYWORD]->(k)
"#;

const EXISTING_TITLES_CYPHER: &str = r#"
    MATCH (t:Title)
    RETURN t.name AS document
"#;

const SEARCH_CYPHER: &str = r#"
    MATCH (t:Title)-[:HAS_KEYWORD]->(k:Keyword)
    WHERE k.sentence CONTAINS $term
    RETURN t.name AS document, k.sentence AS sentence
"#;

/// Graph store backed by Neo4j's HTTP transaction endpoint. Each call is a
/// single auto-committed statement, so Neo4j's own merge-by-key locking
/// serializes concurrent writes to the same node.
pub struct Neo4jStore {
    endpoint: String,
    database: String,
    username: String,
    password: String,
    client: Client,
}

impl Neo4jStore {
    pub fn new(
        endpoint: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            client: Client::new(),
        }
    }

    fn tx_url(&self) -> String {
        format!("{}/db/{}/tx/commit", self.endpoint, self.database)
    }

    async fn run_statement(&self, statement: &str, parameters: Value) -> Result<Value, GraphError> {
        let response = self
            .client
            .post(self.tx_url())
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({
                "statements": [
                    {
                        "statement": statement,
                        "parameters": parameters
                    }
                ]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GraphError::BackendResponse {
                backend: "neo4j".to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;

        if let Some(errors) = body.pointer("/errors").and_then(Value::as_array) {
            if let Some(first) = errors.first() {
                return Err(GraphError::BackendResponse {
                    backend: "neo4j".to_string(),
                    details: first
                        .pointer("/message")
                        .and_then(Value::as_str)
                        .unwrap_or("statement rejected")
                        .to_string(),
                });
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn existing_documents(&self) -> Result<HashSet<String>, GraphError> {
        let body = self
            .run_statement(EXISTING_TITLES_CYPHER, json!({}))
            .await?;

        let documents = extract_rows(&body)
            .into_iter()
            .filter_map(|row| row.first())
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        Ok(documents)
    }

    async fn upsert_document_keyword(
        &self,
        document: &str,
        keyword: &str,
        sentence: &str,
    ) -> Result<(), GraphError> {
        self.run_statement(
            UPSERT_CYPHER,
            json!({
                "document": document,
                "keyword": keyword,
                "sentence": sentence,
            }),
        )
        .await?;

        Ok(())
    }

    async fn search_sentences(&self, term: &str) -> Result<Vec<SentenceMatch>, GraphError> {
        let body = self
            .run_statement(SEARCH_CYPHER, json!({ "term": term }))
            .await?;

        let matches = extract_rows(&body)
            .into_iter()
            .filter_map(|row| {
                let document = row.first().and_then(Value::as_str)?;
                let sentence = row.get(1).and_then(Value::as_str)?;
                Some(SentenceMatch {
                    document: document.to_string(),
                    sentence: sentence.to_string(),
                })
            })
            .collect();

        Ok(matches)
    }
}

/// Flattens the transaction endpoint's response shape
/// (`results[].data[].row`) into plain row arrays.
fn extract_rows(payload: &Value) -> Vec<&Vec<Value>> {
    payload
        .pointer("/results")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|result| result.pointer("/data").and_then(Value::as_array))
        .flatten()
        .filter_map(|entry| entry.pointer("/row").and_then(Value::as_array))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::extract_rows;
    use serde_json::json;

    #[test]
    fn rows_are_extracted_from_tx_response() {
        let payload = json!({
            "results": [
                {
                    "columns": ["document", "sentence"],
                    "data": [
                        { "row": ["/docs/a.txt", "The river flows south"] },
                        { "row": ["/docs/b.txt", "Dogs bark loudly"] }
                    ]
                }
            ],
            "errors": []
        });

        let rows = extract_rows(&payload);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "/docs/a.txt");
        assert_eq!(rows[1][1], "Dogs bark loudly");
    }

    #[test]
    fn malformed_payload_yields_no_rows() {
        assert!(extract_rows(&json!({})).is_empty());
        assert!(extract_rows(&json!({ "results": "nope" })).is_empty());
        assert!(extract_rows(&json!({ "results": [{ "data": [{}] }] })).is_empty());
    }
}
