//! In-memory search over the post corpus.
//!
//! - [`tokenizer`] - the single tokenization rule shared by indexing and querying
//! - [`index`] - token to document-position index, built once per corpus
//! - [`engine`] - prefix query evaluation and the swappable [`QueryEngine`]

pub mod engine;
pub mod index;
pub mod tokenizer;

use serde::Serialize;

use crate::corpus::Document;

pub use engine::{QueryEngine, QueryResult, Snapshot, search};
pub use index::Index;

/// Default number of search results to return.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// A search result as exposed to callers. Ordering carries the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
}

impl From<&Document> for SearchHit {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            description: doc.description.clone(),
            date: doc.date.clone(),
        }
    }
}
