use std::collections::HashSet;

/// Splits raw text into sentences on the literal `.` character, preserving
/// document order and empty fragments. Empty input yields no sentences at
/// all, which is what marks a document as skippable upstream.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split('.').map(str::to_string).collect()
}

/// Collects the candidate keyword set: every whitespace-delimited token that
/// is entirely alphabetic, lowercased. Tokens carrying digits or punctuation
/// are discarded whole rather than trimmed.
pub fn collect_keywords(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .filter(|token| token.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}
