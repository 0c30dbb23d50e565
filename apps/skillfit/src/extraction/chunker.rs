//! Lightweight phrase chunker.
//!
//! Splits text into candidate noun phrases: maximal runs of content words
//! bounded by punctuation, line breaks, sentence ends and function words. No
//! part-of-speech tagging; the skill extractor only needs phrase boundaries.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::taxonomy::normalize_skill;

/// A word-like token. Keeps `.`, `+`, `#`, `/`, `-`, `&` and `'` inside tokens so
/// mentions like `node.js`, `c++`, `ci/cd` and `scikit-learn` stay whole.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.?[A-Za-z0-9][A-Za-z0-9.+#/&'\-]*").expect("valid token regex")
});

/// Function words that end a phrase. "on" is deliberately absent so forms such
/// as "ruby on rails" survive chunking.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "nor", "of", "in", "at", "to", "for",
        "with", "by", "from", "into", "onto", "over", "under", "via", "as", "is",
        "are", "was", "were", "be", "been", "being", "am", "has", "have", "had",
        "do", "does", "did", "will", "would", "shall", "should", "can", "could",
        "may", "might", "must", "i", "me", "my", "we", "our", "us", "you", "your",
        "he", "she", "it", "its", "they", "them", "their", "this", "that", "these",
        "those", "which", "who", "whom", "whose", "what", "where", "when", "while",
        "using", "used", "use", "including", "such", "also", "like", "than", "then",
        "so", "very", "more", "most", "other", "some", "any", "each", "all", "both",
        "not", "no", "about", "across", "within", "through", "per", "etc",
    ]
    .into_iter()
    .collect()
});

fn is_boundary(c: char) -> bool {
    matches!(
        c,
        ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '!' | '?' | '|' | '\n'
            | '"' | '•' | '–' | '—' | '·' | '*' | '.' | '-'
    )
}

/// Splits `text` into phrases, each a list of normalized words.
///
/// Phrases never span punctuation boundaries or line breaks, and never include
/// stopwords. Words inside a token are normalized with `normalize_skill`, so
/// `"CI/CD"` yields the two words `ci`, `cd`.
pub fn noun_phrases(text: &str) -> Vec<Vec<String>> {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut last_end = 0;

    for token in TOKEN_RE.find_iter(text) {
        let gap = &text[last_end..token.start()];
        last_end = token.end();
        if gap.chars().any(is_boundary) {
            flush(&mut current, &mut phrases);
        }

        let raw = token.as_str();
        let ends_sentence = raw.ends_with('.');
        let normalized = normalize_skill(raw);

        if normalized.is_empty() || STOPWORDS.contains(normalized.as_str()) {
            flush(&mut current, &mut phrases);
            continue;
        }

        current.extend(normalized.split(' ').map(str::to_string));
        if ends_sentence {
            flush(&mut current, &mut phrases);
        }
    }
    flush(&mut current, &mut phrases);
    phrases
}

fn flush(current: &mut Vec<String>, phrases: &mut Vec<Vec<String>>) {
    if !current.is_empty() {
        phrases.push(std::mem::take(current));
    }
}
