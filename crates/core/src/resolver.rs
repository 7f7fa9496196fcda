use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Pool width used when the caller does not pick one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

/// The earliest sentence (document order) containing the keyword as a
/// literal substring.
pub fn first_containing_sentence(keyword: &str, sentences: &[String]) -> Option<String> {
    sentences
        .iter()
        .find(|sentence| sentence.contains(keyword))
        .cloned()
}

/// Maps each keyword to its first containing sentence, scanning in parallel
/// on a bounded pool. Keywords that appear in no sentence are dropped.
///
/// Each keyword's answer depends only on the shared sentence sequence, so
/// the mapping is identical for any pool width or completion order. A task
/// that fails to join is logged and its keyword dropped; siblings are
/// unaffected.
pub async fn resolve_keywords(
    keywords: HashSet<String>,
    sentences: Vec<String>,
    max_workers: usize,
) -> HashMap<String, String> {
    let sentences: Arc<[String]> = sentences.into();
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = JoinSet::new();

    for keyword in keywords {
        let sentences = Arc::clone(&sentences);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // The semaphore is never closed, so the permit is always granted.
            let _permit = semaphore.acquire_owned().await.ok();
            let hit = first_containing_sentence(&keyword, &sentences);
            (keyword, hit)
        });
    }

    let mut resolved = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((keyword, Some(sentence))) => {
                resolved.insert(keyword, sentence);
            }
            Ok((_, None)) => {}
            Err(error) => warn!(%error, "keyword resolution task failed"),
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::{first_containing_sentence, resolve_keywords};
    use crate::tokenize::{collect_keywords, split_sentences};
    use std::collections::HashSet;

    fn sample_sentences() -> Vec<String> {
        split_sentences("Cats and dogs. Dogs bark loudly. Cats purr.")
    }

    #[test]
    fn earliest_sentence_wins() {
        let sentences = sample_sentences();
        let hit = first_containing_sentence("dogs", &sentences);
        assert_eq!(hit.as_deref(), Some("Cats and dogs"));
    }

    #[test]
    fn match_is_case_sensitive_substring() {
        let sentences = sample_sentences();
        // "cats" never appears lowercased in the original text.
        assert_eq!(first_containing_sentence("cats", &sentences), None);
        assert_eq!(
            first_containing_sentence("urr", &sentences).as_deref(),
            Some(" Cats purr")
        );
    }

    #[tokio::test]
    async fn unmatched_keywords_are_dropped() {
        let keywords: HashSet<String> = ["dogs".to_string(), "zebra".to_string()].into();
        let resolved = resolve_keywords(keywords, sample_sentences(), 2).await;

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get("dogs").map(String::as_str), Some("Cats and dogs"));
    }

    #[tokio::test]
    async fn mapping_is_independent_of_pool_width() {
        let text = "The river flows south. Dogs bark loudly. Rivers flood in spring.";
        let keywords = collect_keywords(text);
        let sentences = split_sentences(text);

        let serial = resolve_keywords(keywords.clone(), sentences.clone(), 1).await;
        let parallel = resolve_keywords(keywords, sentences, 8).await;

        assert_eq!(serial, parallel);
        assert_eq!(
            serial.get("bark").map(String::as_str),
            Some(" Dogs bark loudly")
        );
    }
}
