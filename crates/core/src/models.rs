use serde::{Deserialize, Serialize};

/// File types the extractor knows how to read. Anything else is skipped
/// during a sync pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    PlainText,
    Pdf,
}

/// One (document, sentence) pair returned by a snippet search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentenceMatch {
    pub document: String,
    pub sentence: String,
}

/// Concurrency knobs for a sync pass. Both pools default to the number of
/// available cores.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub max_document_workers: usize,
    pub max_keyword_workers: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        let workers = crate::resolver::default_worker_count();
        Self {
            max_document_workers: workers,
            max_keyword_workers: workers,
        }
    }
}

/// Outcome counters for one sync pass over a folder.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub files_scanned: u32,
    pub files_known: u32,
    pub files_unsupported: u32,
    pub files_empty: u32,
    pub files_failed: u32,
    pub files_indexed: u32,
    pub keywords_written: usize,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files scanned, {} already indexed, {} unsupported, {} empty, {} failed, {} indexed ({} keywords written)",
            self.files_scanned,
            self.files_known,
            self.files_unsupported,
            self.files_empty,
            self.files_failed,
            self.files_indexed,
            self.keywords_written
        )
    }
}
