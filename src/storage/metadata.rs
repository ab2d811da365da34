//! Metadata tracking for the persisted index and its source file

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{StorageError, StorageResult};
use crate::searchindex::SearchIndex;
use crate::utils::get_utc_timestamp;

/// Bumped whenever the on-disk layout changes; older layouts are rebuilt.
pub const FORMAT_VERSION: u32 = 1;

pub const METADATA_FILE: &str = "index.meta";

/// Metadata about the index state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Version of the index format
    pub version: u32,

    /// `searchindex.js` the index was built from
    pub source: PathBuf,

    /// SHA-256 of the source file at build time
    pub checksum: String,

    pub symbol_count: u32,

    pub document_count: u32,

    pub term_count: u32,

    /// Generator environment version, as written in the source
    #[serde(default)]
    pub envversion: serde_json::Value,

    /// Build timestamp (seconds since UNIX_EPOCH)
    pub built_at: u64,
}

impl IndexMetadata {
    pub fn new(source: impl Into<PathBuf>, checksum: String, index: &SearchIndex) -> Self {
        Self {
            version: FORMAT_VERSION,
            source: source.into(),
            checksum,
            symbol_count: index.object_count() as u32,
            document_count: index.document_count() as u32,
            term_count: (index.terms().len() + index.titleterms().len()) as u32,
            envversion: index.envversion().clone(),
            built_at: get_utc_timestamp(),
        }
    }

    pub fn path(base_path: &Path) -> PathBuf {
        base_path.join(METADATA_FILE)
    }

    /// Save metadata to file
    pub fn save(&self, base_path: &Path) -> StorageResult<()> {
        let metadata_path = Self::path(base_path);
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize metadata: {e}"))
        })?;

        fs::write(&metadata_path, json).map_err(|e| StorageError::file_access(metadata_path, e))
    }

    /// Load metadata from file; `None` when nothing was persisted yet.
    pub fn load(base_path: &Path) -> StorageResult<Option<Self>> {
        let metadata_path = Self::path(base_path);
        if !metadata_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&metadata_path)
            .map_err(|e| StorageError::file_access(&metadata_path, e))?;

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Metadata(format!("Failed to parse metadata: {e}")))
    }

    pub fn is_current_format(&self) -> bool {
        self.version == FORMAT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchindex::parse_search_index;
    use tempfile::TempDir;

    fn metadata() -> IndexMetadata {
        let index = parse_search_index(
            r#"{docnames:["a","b"],envversion:51,filenames:["a.rst","b.rst"],titles:["A","B"],
            terms:{one:0,two:[0,1]},titleterms:{a:0},objects:{"":{m:[0,0,0,"-"]}},
            objnames:{"0":["py","module","Python module"]}}"#,
        )
        .unwrap();
        IndexMetadata::new("docs/searchindex.js", "abc123".to_string(), &index)
    }

    #[test]
    fn test_counts_from_index() {
        let meta = metadata();
        assert_eq!(meta.version, FORMAT_VERSION);
        assert_eq!(meta.symbol_count, 1);
        assert_eq!(meta.document_count, 2);
        assert_eq!(meta.term_count, 3);
        assert_eq!(meta.envversion, serde_json::json!(51));
        assert!(meta.is_current_format());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        assert!(IndexMetadata::load(temp_dir.path()).unwrap().is_none());

        let meta = metadata();
        meta.save(temp_dir.path()).unwrap();
        assert!(temp_dir.path().join(METADATA_FILE).exists());

        let loaded = IndexMetadata::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn test_corrupted_metadata() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(METADATA_FILE), "{not json").unwrap();
        assert!(matches!(
            IndexMetadata::load(temp_dir.path()),
            Err(StorageError::Metadata(_))
        ));
    }
}
