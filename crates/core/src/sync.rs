use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::extractor::{detect_kind, TextExtractor};
use crate::models::{DocumentKind, SyncOptions, SyncReport};
use crate::resolver::resolve_keywords;
use crate::tokenize::{collect_keywords, split_sentences};
use crate::traits::GraphStore;
use crate::GraphError;

/// Every file under the root, recursively, in a stable order. The root is
/// canonicalized first: document identities are absolute paths, so two sync
/// passes over differently spelled roots must agree on them. A root that
/// cannot be canonicalized is walked as given and yields nothing.
pub fn discover_files(root: &Path) -> Vec<PathBuf> {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).into_iter().filter_map(|item| item.ok()) {
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

enum IndexOutcome {
    Indexed { keywords: usize },
    Empty,
    Failed,
}

/// One full sync pass: diff the folder against the graph's known documents
/// and index each new file on a bounded pool, one task per file.
///
/// Task failures are contained; a file that fails extraction or writing is
/// logged and left out of the graph, so the next pass will pick it up again.
/// Already-known paths are skipped unconditionally, even if their content
/// changed on disk.
pub async fn sync_folder<S, E>(
    store: Arc<S>,
    extractor: Arc<E>,
    root: &Path,
    options: SyncOptions,
) -> Result<SyncReport, GraphError>
where
    S: GraphStore + Send + Sync + 'static,
    E: TextExtractor + Send + Sync + 'static,
{
    let known = store.existing_documents().await?;
    let files = discover_files(root);

    let mut report = SyncReport {
        files_scanned: files.len() as u32,
        ..SyncReport::default()
    };

    let semaphore = Arc::new(Semaphore::new(options.max_document_workers.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        if known.contains(path.to_string_lossy().as_ref()) {
            report.files_known += 1;
            continue;
        }

        let Some(kind) = detect_kind(&path) else {
            debug!(path = %path.display(), "skipping unsupported file type");
            report.files_unsupported += 1;
            continue;
        };

        let store = Arc::clone(&store);
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);
        let keyword_workers = options.max_keyword_workers;

        tasks.spawn(async move {
            // The semaphore is never closed, so the permit is always granted.
            let _permit = semaphore.acquire_owned().await.ok();
            index_file(store.as_ref(), extractor, path, kind, keyword_workers).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(IndexOutcome::Indexed { keywords }) => {
                report.files_indexed += 1;
                report.keywords_written += keywords;
            }
            Ok(IndexOutcome::Empty) => report.files_empty += 1,
            Ok(IndexOutcome::Failed) => report.files_failed += 1,
            Err(error) => {
                report.files_failed += 1;
                error!(%error, "indexing task panicked");
            }
        }
    }

    Ok(report)
}

/// Extract → tokenize → resolve → upsert for a single new file. A document
/// whose text is empty is not written to the graph at all, not even as a
/// bare Title node.
async fn index_file<S, E>(
    store: &S,
    extractor: Arc<E>,
    path: PathBuf,
    kind: DocumentKind,
    keyword_workers: usize,
) -> IndexOutcome
where
    S: GraphStore + Sync,
    E: TextExtractor + Send + Sync + 'static,
{
    let document = path.to_string_lossy().to_string();

    let extracted = {
        let target = path.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&target, kind)).await
    };

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(error)) => {
            warn!(path = %document, %error, "extraction failed, skipping file");
            return IndexOutcome::Failed;
        }
        Err(error) => {
            error!(path = %document, %error, "extraction task panicked");
            return IndexOutcome::Failed;
        }
    };

    if text.trim().is_empty() {
        info!(path = %document, "no text detected, skipping file");
        return IndexOutcome::Empty;
    }

    let sentences = split_sentences(&text);
    let keywords = collect_keywords(&text);
    let resolved = resolve_keywords(keywords, sentences, keyword_workers).await;

    let mut written = 0usize;
    for (keyword, sentence) in &resolved {
        if let Err(error) = store.upsert_document_keyword(&document, keyword, sentence).await {
            warn!(path = %document, keyword = %keyword, %error, "keyword upsert failed");
            return IndexOutcome::Failed;
        }
        written += 1;
    }

    info!(path = %document, keywords = written, "indexed file");
    IndexOutcome::Indexed { keywords: written }
}
