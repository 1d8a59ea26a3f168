//! Local filesystem storage backend.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::corpus::{MANIFEST_FILE, Manifest};
use crate::storage::{StorageBackend, StorageError};

/// Storage backend reading a corpus directory on the local filesystem.
pub struct LocalStorageBackend {
    root: PathBuf,
}

impl LocalStorageBackend {
    /// Create a new local storage backend rooted at the given path.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Resolve a relative path, refusing anything that leaves the root.
    ///
    /// Rejects `..` components and absolute paths up front, then canonicalizes
    /// the target so symlinks pointing outside the root are caught too.
    fn resolve_within_root(&self, relative_path: &Path) -> Result<PathBuf, StorageError> {
        if relative_path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath("path cannot be empty".to_string()));
        }

        if relative_path.is_absolute() {
            return Err(StorageError::InvalidPath(format!(
                "{} must be relative",
                relative_path.display()
            )));
        }

        if relative_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::InvalidPath(format!(
                "{} contains '..' component",
                relative_path.display()
            )));
        }

        let full_path = self.root.join(relative_path);

        if !full_path.exists() {
            return Err(StorageError::NotFound(full_path.display().to_string()));
        }

        let canonical_root = self
            .root
            .canonicalize()
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", self.root.display())))?;
        let canonical_path = full_path
            .canonicalize()
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", full_path.display())))?;

        if !canonical_path.starts_with(&canonical_root) {
            return Err(StorageError::InvalidPath(format!(
                "{} escapes corpus root",
                relative_path.display()
            )));
        }

        Ok(full_path)
    }
}

impl StorageBackend for LocalStorageBackend {
    fn read_manifest(&self) -> Result<Manifest, StorageError> {
        let path = self.manifest_path();

        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", path.display())))?;

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::ParseError(format!("{}: {e}", path.display())))
    }

    fn read_document(&self, path: &Path) -> Result<String, StorageError> {
        let full_path = self.resolve_within_root(path)?;

        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", full_path.display())))
    }

    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
