//! Excerpts around a query match, and highlight splitting for display.
//!
//! All offsets and lengths are in characters, not bytes. Matching is
//! case-insensitive; the returned text keeps the original casing.
//!
//! The truncation markers follow fixed rules:
//!
//! - empty content gives an empty excerpt
//! - an empty query gives the first `max_length` characters, never with `...`
//! - a query that is not found gives the first `max_length` characters
//!   followed by `...`, even when nothing was cut
//! - a found query gives 50 characters before it and 100 after its end, with
//!   `...` on each side that was cut

/// Default excerpt length used when no match is found.
pub const DEFAULT_MAX_LENGTH: usize = 150;

const CONTEXT_BEFORE: usize = 50;
const CONTEXT_AFTER: usize = 100;
const ELLIPSIS: &str = "...";

/// Extract a snippet of `content` around the first occurrence of `query`.
#[must_use]
pub fn extract_excerpt(content: &str, query: &str, max_length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    if query.is_empty() {
        return take_chars(content, max_length);
    }

    let chars: Vec<char> = content.chars().collect();

    let Some(offset) = find_folded(&chars, query) else {
        let mut excerpt = take_chars(content, max_length);
        excerpt.push_str(ELLIPSIS);
        return excerpt;
    };

    let start = offset.saturating_sub(CONTEXT_BEFORE);
    let end = (offset + query.chars().count() + CONTEXT_AFTER).min(chars.len());

    let mut excerpt = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.extend(&chars[start..end]);
    if end < chars.len() {
        excerpt.push_str(ELLIPSIS);
    }

    excerpt
}

/// A piece of highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` on every case-insensitive occurrence of `query`.
///
/// Concatenating the fragments yields `text` unchanged.
#[must_use]
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Fragment<'a>> {
    if text.is_empty() {
        return Vec::new();
    }

    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() {
        return vec![Fragment {
            text,
            matched: false,
        }];
    }

    let indices: Vec<(usize, char)> = text.char_indices().collect();
    let folded: Vec<char> = indices.iter().map(|&(_, c)| fold(c)).collect();
    let byte_at = |i: usize| indices.get(i).map_or(text.len(), |&(byte, _)| byte);

    let mut fragments = Vec::new();
    let mut last = 0;
    let mut i = 0;

    while i + needle.len() <= folded.len() {
        if folded[i..i + needle.len()] == needle[..] {
            if last < i {
                fragments.push(Fragment {
                    text: &text[byte_at(last)..byte_at(i)],
                    matched: false,
                });
            }
            fragments.push(Fragment {
                text: &text[byte_at(i)..byte_at(i + needle.len())],
                matched: true,
            });
            i += needle.len();
            last = i;
        } else {
            i += 1;
        }
    }

    if last < folded.len() {
        fragments.push(Fragment {
            text: &text[byte_at(last)..],
            matched: false,
        });
    }

    fragments
}

/// Render `text` with every match of `query` wrapped in `open`/`close`.
#[must_use]
pub fn render_highlighted(text: &str, query: &str, open: &str, close: &str) -> String {
    highlight(text, query)
        .into_iter()
        .map(|fragment| {
            if fragment.matched {
                format!("{open}{}{close}", fragment.text)
            } else {
                fragment.text.to_string()
            }
        })
        .collect()
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Single-char lowercase so folded offsets line up with the original text.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_folded(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let folded: Vec<char> = haystack.iter().copied().map(fold).collect();
    folded.windows(needle.len()).position(|window| window == needle)
}
