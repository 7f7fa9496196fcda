use crate::{GraphError, SentenceMatch};
use async_trait::async_trait;
use std::collections::HashSet;

/// Seam to the shared graph store. The store's own merge-by-key atomicity
/// is the only synchronization; callers issue concurrent upserts freely.
#[async_trait]
pub trait GraphStore {
    /// Identities (file paths) of every document already in the graph.
    async fn existing_documents(&self) -> Result<HashSet<String>, GraphError>;

    /// Atomically merges the Title node, the Keyword node (overwriting its
    /// stored sentence), and the HAS_KEYWORD edge between them.
    async fn upsert_document_keyword(
        &self,
        document: &str,
        keyword: &str,
        sentence: &str,
    ) -> Result<(), GraphError>;

    /// Every (document, sentence) pair whose stored sentence contains the
    /// term as a substring.
    async fn search_sentences(&self, term: &str) -> Result<Vec<SentenceMatch>, GraphError>;
}
