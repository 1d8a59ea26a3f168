//! Blog post corpus: document types, manifest parsing and ingestion checks.
//!
//! A [`Corpus`] is an immutable, ordered snapshot of posts. Positions in the
//! snapshot are what the search index refers to, so the order is preserved
//! exactly as supplied.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::local::LocalStorageBackend;
use crate::storage::{StorageBackend, StorageError};

/// File name of the manifest at the corpus root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Errors that can occur when loading or validating a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Manifest not found at {0}")]
    ManifestNotFound(PathBuf),

    #[error("Post #{index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Post #{index} has an empty '{field}'")]
    EmptyField { index: usize, field: &'static str },

    #[error("Duplicate post id: {0}")]
    DuplicateId(String),

    #[error("Post '{id}' has an invalid date: {date}")]
    InvalidDate { id: String, date: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A blog post as seen by the search subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (the post slug).
    pub id: String,
    pub title: String,
    pub description: String,
    /// ISO-8601 publication date.
    pub date: String,
    /// Full post text, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Document {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            date: date.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Text used for excerpts: the body when present, otherwise the description.
    #[must_use]
    pub fn content(&self) -> &str {
        match self.body.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => &self.description,
        }
    }
}

/// One post entry in manifest.json.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as [`CorpusError::MissingField`] with the entry's position rather
/// than as an opaque JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    /// Body file relative to the corpus root (e.g., "posts/hello-world.md").
    pub path: Option<PathBuf>,
}

/// The manifest.json structure listing all posts in a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub posts: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: "1".to_string(),
            posts: vec![],
        }
    }
}

/// An immutable, ordered snapshot of validated posts.
///
/// Cloning is cheap: the documents are shared.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Arc<[Document]>,
}

impl Corpus {
    /// Build a corpus from already-constructed documents.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::EmptyField` for an empty id or title,
    /// `CorpusError::InvalidDate` for a date that is not ISO-8601, and
    /// `CorpusError::DuplicateId` when two posts share an id.
    pub fn new(documents: Vec<Document>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(documents.len());

        for (index, doc) in documents.iter().enumerate() {
            validate_document(index, doc)?;
            if !seen.insert(doc.id.as_str()) {
                return Err(CorpusError::DuplicateId(doc.id.clone()));
            }
        }

        Ok(Self {
            documents: documents.into(),
        })
    }

    /// Load a corpus from a directory containing manifest.json.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::ManifestNotFound` if manifest.json doesn't exist,
    /// or any ingestion error from [`Corpus::from_storage`].
    pub fn load(root: &Path) -> Result<Self, CorpusError> {
        let storage = LocalStorageBackend::new(root.to_path_buf());

        if !storage.exists(Path::new(MANIFEST_FILE)) {
            return Err(CorpusError::ManifestNotFound(
                storage.root().join(MANIFEST_FILE),
            ));
        }

        Self::from_storage(&storage)
    }

    /// Load and validate every post listed in the backend's manifest.
    ///
    /// Either the whole corpus loads or nothing does; a single bad entry
    /// fails the load.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` for unreadable storage, missing or empty fields,
    /// invalid dates, unreadable body files and duplicate ids.
    pub fn from_storage(storage: &dyn StorageBackend) -> Result<Self, CorpusError> {
        let manifest = storage.read_manifest()?;

        let documents = manifest
            .posts
            .into_iter()
            .enumerate()
            .map(|(index, entry)| document_from_entry(index, entry, storage))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(documents)
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Source of the corpus snapshot.
///
/// Implementations should be cheap to call repeatedly; the search engine
/// treats a call as synchronous and side-effect free.
pub trait DocumentSupplier: Send + Sync {
    /// Return the full ordered corpus.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the corpus cannot be produced.
    fn corpus(&self) -> Result<Corpus, CorpusError>;
}

impl DocumentSupplier for Corpus {
    fn corpus(&self) -> Result<Corpus, CorpusError> {
        Ok(self.clone())
    }
}

/// Supplies the corpus stored under a directory, loading it at most once.
pub struct ManifestSupplier {
    root: PathBuf,
    cached: OnceLock<Corpus>,
}

impl ManifestSupplier {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cached: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSupplier for ManifestSupplier {
    fn corpus(&self) -> Result<Corpus, CorpusError> {
        if let Some(corpus) = self.cached.get() {
            return Ok(corpus.clone());
        }

        let corpus = Corpus::load(&self.root)?;
        Ok(self.cached.get_or_init(|| corpus).clone())
    }
}

fn document_from_entry(
    index: usize,
    entry: ManifestEntry,
    storage: &dyn StorageBackend,
) -> Result<Document, CorpusError> {
    let required = |value: Option<String>, field: &'static str| {
        value.ok_or(CorpusError::MissingField { index, field })
    };

    let mut doc = Document::new(
        required(entry.id, "id")?,
        required(entry.title, "title")?,
        required(entry.description, "description")?,
        required(entry.date, "date")?,
    );

    if let Some(path) = entry.path {
        doc.body = Some(storage.read_document(&path)?);
    }

    Ok(doc)
}

fn validate_document(index: usize, doc: &Document) -> Result<(), CorpusError> {
    if doc.id.trim().is_empty() {
        return Err(CorpusError::EmptyField { index, field: "id" });
    }
    if doc.title.trim().is_empty() {
        return Err(CorpusError::EmptyField {
            index,
            field: "title",
        });
    }
    if !is_iso8601_date(&doc.date) {
        return Err(CorpusError::InvalidDate {
            id: doc.id.clone(),
            date: doc.date.clone(),
        });
    }
    Ok(())
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` and plain dates.
fn is_iso8601_date(date: &str) -> bool {
    DateTime::parse_from_rfc3339(date).is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
