use crate::traits::GraphStore;
use crate::{GraphError, SentenceMatch};
use tracing::debug;

/// Read side of the graph: substring search over the sentence snippets
/// stored on Keyword nodes. The term is matched against sentences only,
/// never against keyword names, and results come back in store order.
pub struct QueryEngine<S: GraphStore> {
    store: S,
}

impl<S: GraphStore + Sync> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// An empty or whitespace-only term matches nothing.
    pub async fn search(&self, term: &str) -> Result<Vec<SentenceMatch>, GraphError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self.store.search_sentences(term).await?;
        debug!(term, hits = matches.len(), "snippet search completed");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryEngine;
    use crate::traits::GraphStore;
    use crate::{GraphError, SentenceMatch};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};

    /// Keyword name → (document, stored sentence).
    struct FakeGraph {
        keywords: HashMap<String, (String, String)>,
    }

    impl FakeGraph {
        fn with_river() -> Self {
            let mut keywords = HashMap::new();
            keywords.insert(
                "river".to_string(),
                ("A".to_string(), "The river flows south".to_string()),
            );
            Self { keywords }
        }
    }

    #[async_trait]
    impl GraphStore for FakeGraph {
        async fn existing_documents(&self) -> Result<HashSet<String>, GraphError> {
            Ok(self
                .keywords
                .values()
                .map(|(document, _)| document.clone())
                .collect())
        }

        async fn upsert_document_keyword(
            &self,
            _document: &str,
            _keyword: &str,
            _sentence: &str,
        ) -> Result<(), GraphError> {
            Ok(())
        }

        async fn search_sentences(&self, term: &str) -> Result<Vec<SentenceMatch>, GraphError> {
            Ok(self
                .keywords
                .values()
                .filter(|(_, sentence)| sentence.contains(term))
                .map(|(document, sentence)| SentenceMatch {
                    document: document.clone(),
                    sentence: sentence.clone(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn term_matches_stored_sentence() {
        let engine = QueryEngine::new(FakeGraph::with_river());

        let matches = engine.search("river").await.expect("search should succeed");
        assert_eq!(
            matches,
            vec![SentenceMatch {
                document: "A".to_string(),
                sentence: "The river flows south".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn term_need_not_equal_any_keyword() {
        let engine = QueryEngine::new(FakeGraph::with_river());

        // "flows" is not a keyword in the fake graph; it only appears inside
        // the sentence stored for "river".
        let matches = engine.search("flows").await.expect("search should succeed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].document, "A");
    }

    #[tokio::test]
    async fn unmatched_term_returns_nothing() {
        let engine = QueryEngine::new(FakeGraph::with_river());
        let matches = engine.search("ocean").await.expect("search should succeed");
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn empty_term_matches_nothing() {
        let engine = QueryEngine::new(FakeGraph::with_river());
        assert!(engine.search("").await.expect("search should succeed").is_empty());
        assert!(engine.search("   ").await.expect("search should succeed").is_empty());
    }
}
