//! Failures while persisting or reading back an index.

use std::path::PathBuf;

use tantivy::TantivyError;
use tantivy::directory::error::OpenDirectoryError;
use thiserror::Error;

use crate::error::IndexError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Symbol index error: {0}")]
    Tantivy(#[from] TantivyError),

    #[error("Cannot open symbol index directory: {0}")]
    Directory(#[from] OpenDirectoryError),

    /// The on-disk symbol index lacks a field this version expects.
    #[error("Symbol index schema mismatch: {0}")]
    SchemaError(String),

    #[error("Stored {field} is invalid: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Cannot access '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot error: {0}")]
    Serialization(String),

    #[error("Index metadata error: {0}")]
    Metadata(String),

    #[error("No persisted index at '{0}'")]
    NotIndexed(PathBuf),

    /// The source file itself is unreadable or inconsistent.
    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}
