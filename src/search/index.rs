//! Token index over a corpus snapshot.
//!
//! Maps every distinct token to the set of document positions containing it.
//! Tokens are kept sorted so a prefix lookup is a single range scan.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use tracing::debug;

use crate::corpus::Document;
use crate::search::tokenizer::tokenize;

/// Read-only token index. Positions are offsets into the corpus it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    postings: BTreeMap<String, BTreeSet<usize>>,
    doc_count: usize,
}

impl Index {
    /// Build the index from an ordered slice of documents.
    ///
    /// Indexes title, description and body (when present). Repeated tokens
    /// within one document are recorded once.
    #[must_use]
    pub fn build(documents: &[Document]) -> Self {
        let mut postings: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();

        for (position, doc) in documents.iter().enumerate() {
            for token in document_tokens(doc) {
                postings.entry(token).or_default().insert(position);
            }
        }

        let index = Self {
            postings,
            doc_count: documents.len(),
        };
        debug!(
            documents = index.doc_count(),
            tokens = index.token_count(),
            "built search index"
        );
        index
    }

    /// Number of documents the index was built from.
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    /// Positions of documents containing exactly `token`.
    #[cfg(test)]
    fn postings(&self, token: &str) -> Option<&BTreeSet<usize>> {
        self.postings.get(token)
    }

    /// All indexed tokens starting with `prefix`, with their postings.
    pub fn prefix_matches<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a BTreeSet<usize>)> + 'a {
        self.postings
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(token, _)| token.starts_with(prefix))
            .map(|(token, positions)| (token.as_str(), positions))
    }
}

fn document_tokens(doc: &Document) -> Vec<String> {
    let mut text = format!("{} {}", doc.title, doc.description);
    if let Some(body) = &doc.body {
        text.push(' ');
        text.push_str(body);
    }
    tokenize(&text)
}
