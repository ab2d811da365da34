//! Error types for loading and validating search indexes.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{DocId, ObjTypeId};

/// Errors raised while reading, parsing or validating a search index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse search index: {0}")]
    Parse(String),

    #[error("Inconsistent document tables: {docnames} docnames, {filenames} filenames, {titles} titles")]
    DocumentTables {
        docnames: usize,
        filenames: usize,
        titles: usize,
    },

    #[error("Object '{symbol}' refers to unknown document {doc:?}")]
    UnknownDocument { symbol: String, doc: DocId },

    #[error("Object '{symbol}' refers to unknown object type {objtype}")]
    UnknownObjectType { symbol: String, objtype: ObjTypeId },

    #[error("Term '{term}' refers to unknown document {doc:?}")]
    UnknownTermDocument { term: String, doc: DocId },

    #[error("Invalid entry for '{symbol}': {reason}")]
    InvalidEntry { symbol: String, reason: String },

    #[error("Duplicate symbol '{0}' in one generation pass")]
    DuplicateSymbol(String),

    #[error("Symbol id space exhausted")]
    IdOverflow,
}

pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    /// Short machine-readable status, used in JSON output.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::DocumentTables { .. }
            | Self::UnknownDocument { .. }
            | Self::UnknownObjectType { .. }
            | Self::UnknownTermDocument { .. }
            | Self::InvalidEntry { .. } => "VALIDATION_ERROR",
            Self::DuplicateSymbol(_) => "DUPLICATE_SYMBOL",
            Self::IdOverflow => "INTERNAL_ERROR",
        }
    }

    /// Recovery hints shown next to the error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the path points at the generated searchindex.js",
                "Rebuild the documentation to regenerate the index",
            ],
            Self::Parse(_) => vec![
                "The file must contain Search.setIndex({...}) or a bare index object",
                "Regenerate the documentation; partial writes leave truncated files",
            ],
            Self::DuplicateSymbol(_) => {
                vec!["Two objects share one qualified name; check for duplicate directives"]
            }
            _ => vec!["Regenerate the documentation and index it again"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IndexError::DuplicateSymbol("todo_list.model".to_string());
        assert_eq!(
            err.to_string(),
            "Duplicate symbol 'todo_list.model' in one generation pass"
        );
        assert_eq!(err.status_code(), "DUPLICATE_SYMBOL");

        let err = IndexError::UnknownDocument {
            symbol: "a.b".to_string(),
            doc: DocId::new(9),
        };
        assert!(err.to_string().contains("a.b"));
        assert_eq!(err.status_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_suggestions_present() {
        let err = IndexError::Parse("unexpected end".to_string());
        assert!(!err.recovery_suggestions().is_empty());
    }
}
