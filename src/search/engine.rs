//! Query evaluation over a corpus snapshot.
//!
//! Every query token is matched as a prefix against the indexed tokens. A
//! document qualifies only if each query token matches something in it; the
//! score is the number of distinct query tokens it satisfies, and ties keep
//! corpus order.
//!
//! [`QueryEngine`] owns the current corpus and index together and replaces
//! both in one swap when the corpus changes, so readers never see an index
//! that does not belong to its corpus.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, error};

use crate::corpus::{Corpus, CorpusError, Document, DocumentSupplier};
use crate::search::SearchHit;
use crate::search::index::Index;
use crate::search::tokenizer::tokenize_unique;

/// Internal query failures. Never returned from [`search`].
#[derive(Debug, Error)]
enum SearchError {
    #[error("index covers {index_docs} documents but corpus has {corpus_docs}")]
    CorpusMismatch {
        index_docs: usize,
        corpus_docs: usize,
    },

    #[error("posting refers to position {position} outside corpus of {corpus_len}")]
    StalePosting { position: usize, corpus_len: usize },
}

/// A ranked match. Produced fresh per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<'a> {
    pub document: &'a Document,
    /// Number of distinct query tokens satisfied.
    pub score: usize,
    /// Position of the document in the corpus.
    pub position: usize,
}

/// Search `corpus` through `index`, returning at most `limit` ranked results.
///
/// Empty, whitespace-only and punctuation-only queries return nothing. Any
/// internal failure is logged and degrades to an empty result list.
#[must_use]
pub fn search<'a>(
    index: &Index,
    corpus: &'a Corpus,
    query: &str,
    limit: usize,
) -> Vec<QueryResult<'a>> {
    match try_search(index, corpus, query, limit) {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, query, "search failed, returning no results");
            Vec::new()
        }
    }
}

fn try_search<'a>(
    index: &Index,
    corpus: &'a Corpus,
    query: &str,
    limit: usize,
) -> Result<Vec<QueryResult<'a>>, SearchError> {
    if query.trim().is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    if index.doc_count() != corpus.len() {
        return Err(SearchError::CorpusMismatch {
            index_docs: index.doc_count(),
            corpus_docs: corpus.len(),
        });
    }

    let tokens = tokenize_unique(query);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    // position -> number of query tokens satisfied
    let mut scores: BTreeMap<usize, usize> = BTreeMap::new();
    for token in &tokens {
        let matched: BTreeSet<usize> = index
            .prefix_matches(token)
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();

        for position in matched {
            *scores.entry(position).or_default() += 1;
        }
    }

    let documents = corpus.documents();
    let required = tokens.len();

    let mut results = scores
        .into_iter()
        .filter(|&(_, score)| score == required)
        .map(|(position, score)| {
            let document = documents.get(position).ok_or(SearchError::StalePosting {
                position,
                corpus_len: documents.len(),
            })?;
            Ok(QueryResult {
                document,
                score,
                position,
            })
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    results.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
    results.truncate(limit);

    debug!(query, tokens = required, results = results.len(), "search complete");

    Ok(results)
}

/// A corpus together with the index built from it.
#[derive(Debug, Default)]
pub struct Snapshot {
    corpus: Corpus,
    index: Index,
}

impl Snapshot {
    #[must_use]
    pub fn new(corpus: Corpus) -> Self {
        let index = Index::build(corpus.documents());
        Self { corpus, index }
    }

    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<QueryResult<'_>> {
        search(&self.index, &self.corpus, query, limit)
    }
}

/// Owns the current [`Snapshot`] and swaps it wholesale on rebuild.
///
/// Queries clone the `Arc` of the current snapshot and run without holding
/// the lock, so a rebuild never blocks on or interleaves with a search.
#[derive(Debug, Default)]
pub struct QueryEngine {
    current: RwLock<Arc<Snapshot>>,
}

impl QueryEngine {
    #[must_use]
    pub fn new(corpus: Corpus) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::new(corpus))),
        }
    }

    /// Build an engine from whatever the supplier currently provides.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the supplier fails.
    pub fn from_supplier(supplier: &dyn DocumentSupplier) -> Result<Self, CorpusError> {
        Ok(Self::new(supplier.corpus()?))
    }

    /// Replace the corpus and index. The new index is fully built before it
    /// becomes visible.
    pub fn rebuild(&self, corpus: Corpus) {
        let snapshot = Arc::new(Snapshot::new(corpus));
        *self.current.write() = snapshot;
    }

    /// Rebuild from the supplier. On failure the previous snapshot stays live.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the supplier fails.
    pub fn reload(&self, supplier: &dyn DocumentSupplier) -> Result<(), CorpusError> {
        let corpus = supplier.corpus()?;
        self.rebuild(corpus);
        Ok(())
    }

    /// The snapshot queries currently run against.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Run a query against the current snapshot.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let snapshot = self.snapshot();
        snapshot
            .search(query, limit)
            .into_iter()
            .map(|result| SearchHit::from(result.document))
            .collect()
    }
}
