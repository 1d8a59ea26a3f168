//! Storage backend trait and implementations.
//!
//! The corpus is read through this abstraction so that the search core never
//! touches the filesystem directly. Only a local backend exists today.

pub mod local;

use std::path::Path;

use crate::corpus::Manifest;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to parse manifest: {0}")]
    ParseError(String),
}

/// Trait for storage backends holding a post corpus.
pub trait StorageBackend: Send + Sync {
    /// Read the manifest from the storage root.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the manifest is missing, unreadable or malformed.
    fn read_manifest(&self) -> Result<Manifest, StorageError>;

    /// Read a post body by its path relative to the root.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if the path escapes the root, or a
    /// read error if the file cannot be read.
    fn read_document(&self, path: &Path) -> Result<String, StorageError>;

    /// Check if a path exists in storage.
    fn exists(&self, path: &Path) -> bool;

    /// Get the root path/identifier for this storage backend.
    fn root(&self) -> &Path;
}
