//! Text tokenizer for indexing and queries.
//!
//! Lowercase, then split on anything that is not a word character
//! (alphanumeric or `_`). No stemming, no stopwords, no minimum length.

use std::collections::HashSet;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize text into case-folded word tokens, in order of appearance.
///
/// # Example
///
/// ```
/// use postfind::search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Tokenize and drop repeats, keeping the first occurrence of each token.
#[must_use]
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
