//! On-disk layout of a persisted index.
//!
//! ```text
//! <base>/index.meta      metadata (source path, checksum, counts)
//! <base>/snapshot.json   normalized search index
//! <base>/tantivy/        symbol index for fuzzy lookup
//! ```
//!
//! Everything under `<base>` is rebuilt together from one source file.

use std::fs;
use std::path::{Path, PathBuf};

use super::{IndexMetadata, StorageError, StorageResult, SymbolIndex};
use crate::registry::SymbolRegistry;
use crate::searchindex::{SearchIndex, parse_search_index};
use crate::utils::calculate_hash;

const SNAPSHOT_FILE: &str = "snapshot.json";
const TANTIVY_DIR: &str = "tantivy";

/// How a [`LoadedIndex`] came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Read back from a fresh snapshot.
    Snapshot,
    /// Built from the source file during this call.
    Built,
}

/// Everything needed to answer queries.
#[derive(Debug)]
pub struct LoadedIndex {
    pub index: SearchIndex,
    pub registry: SymbolRegistry,
    pub symbols: SymbolIndex,
    pub metadata: IndexMetadata,
    pub origin: IndexOrigin,
}

/// Manages persistence of the index
#[derive(Debug, Clone)]
pub struct IndexPersistence {
    base_path: PathBuf,
}

impl IndexPersistence {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn snapshot_path(&self) -> PathBuf {
        self.base_path.join(SNAPSHOT_FILE)
    }

    fn tantivy_path(&self) -> PathBuf {
        self.base_path.join(TANTIVY_DIR)
    }

    /// Check if a complete index exists
    pub fn exists(&self) -> bool {
        IndexMetadata::path(&self.base_path).exists()
            && self.snapshot_path().exists()
            && self.tantivy_path().join("meta.json").exists()
    }

    pub fn metadata(&self) -> StorageResult<Option<IndexMetadata>> {
        IndexMetadata::load(&self.base_path)
    }

    /// True when the persisted index is missing, from an older format, or
    /// was built from different source contents.
    pub fn is_stale(&self, source: &Path) -> StorageResult<bool> {
        if !self.exists() {
            return Ok(true);
        }
        let Some(metadata) = self.metadata()? else {
            return Ok(true);
        };
        if !metadata.is_current_format() {
            return Ok(true);
        }

        let bytes = fs::read(source).map_err(|e| StorageError::file_access(source, e))?;
        Ok(calculate_hash(&bytes) != metadata.checksum)
    }

    /// Parse, validate and persist `source`, replacing whatever was there.
    pub fn build(&self, source: &Path) -> StorageResult<LoadedIndex> {
        let bytes = fs::read(source).map_err(|e| StorageError::file_access(source, e))?;
        let checksum = calculate_hash(&bytes);
        let text = String::from_utf8(bytes).map_err(|e| {
            StorageError::Serialization(format!("{} is not valid UTF-8: {e}", source.display()))
        })?;

        let index = parse_search_index(&text)?;
        index.validate()?;
        let registry = SymbolRegistry::build(&index)?;

        fs::create_dir_all(&self.base_path)
            .map_err(|e| StorageError::file_access(&self.base_path, e))?;

        let tantivy_path = self.tantivy_path();
        if tantivy_path.exists() {
            fs::remove_dir_all(&tantivy_path)
                .map_err(|e| StorageError::file_access(&tantivy_path, e))?;
        }
        let symbols = SymbolIndex::open(&tantivy_path)?;
        symbols.rebuild(&registry)?;

        let snapshot = serde_json::to_string(&index)
            .map_err(|e| StorageError::Serialization(format!("Failed to serialize snapshot: {e}")))?;
        let snapshot_path = self.snapshot_path();
        fs::write(&snapshot_path, snapshot)
            .map_err(|e| StorageError::file_access(&snapshot_path, e))?;

        // Written last: its presence marks a complete build.
        let metadata = IndexMetadata::new(source, checksum, &index);
        metadata.save(&self.base_path)?;

        tracing::info!(
            target: "storage",
            "indexed {} ({} symbols, {} documents) into {}",
            source.display(),
            registry.len(),
            index.document_count(),
            self.base_path.display()
        );

        Ok(LoadedIndex {
            index,
            registry,
            symbols,
            metadata,
            origin: IndexOrigin::Built,
        })
    }

    /// Read the persisted index back.
    pub fn load(&self) -> StorageResult<LoadedIndex> {
        if !self.exists() {
            return Err(StorageError::NotIndexed(self.base_path.clone()));
        }
        let metadata = self
            .metadata()?
            .ok_or_else(|| StorageError::NotIndexed(self.base_path.clone()))?;

        let snapshot_path = self.snapshot_path();
        let json = fs::read_to_string(&snapshot_path)
            .map_err(|e| StorageError::file_access(&snapshot_path, e))?;
        let index: SearchIndex = serde_json::from_str(&json)
            .map_err(|e| StorageError::Serialization(format!("Failed to parse snapshot: {e}")))?;

        let registry = SymbolRegistry::build(&index)?;
        let symbols = SymbolIndex::open(self.tantivy_path())?;

        tracing::debug!(
            target: "storage",
            "loaded snapshot with {} symbols from {}",
            registry.len(),
            self.base_path.display()
        );

        Ok(LoadedIndex {
            index,
            registry,
            symbols,
            metadata,
            origin: IndexOrigin::Snapshot,
        })
    }

    /// Load the persisted index, rebuilding it when forced, missing or stale.
    pub fn load_or_build(&self, source: &Path, force: bool) -> StorageResult<LoadedIndex> {
        if force {
            tracing::debug!(target: "storage", "forced rebuild of {}", source.display());
            return self.build(source);
        }
        if self.is_stale(source)? {
            tracing::debug!(target: "storage", "{} changed or not indexed yet", source.display());
            return self.build(source);
        }
        self.load()
    }

    /// Delete the persisted index
    pub fn clear(&self) -> StorageResult<()> {
        let tantivy_path = self.tantivy_path();
        if tantivy_path.exists() {
            fs::remove_dir_all(&tantivy_path)
                .map_err(|e| StorageError::file_access(&tantivy_path, e))?;
        }
        for path in [self.snapshot_path(), IndexMetadata::path(&self.base_path)] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| StorageError::file_access(&path, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use tempfile::TempDir;

    const SOURCE: &str = r#"Search.setIndex({docnames:["api"],envversion:51,filenames:["api.rst"],titles:["API"],
        objects:{"":{pkg:[0,0,0,"-"]},"pkg":{Thing:[0,1,1,""]}},
        objnames:{"0":["py","module","Python module"],"1":["py","class","Python class"]},
        terms:{thing:0},titleterms:{api:0}})"#;

    fn setup() -> (TempDir, PathBuf, IndexPersistence) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("searchindex.js");
        fs::write(&source, SOURCE).unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().join("index"));
        (temp_dir, source, persistence)
    }

    #[test]
    fn test_build_then_load() {
        let (_temp_dir, source, persistence) = setup();
        assert!(!persistence.exists());
        assert!(persistence.is_stale(&source).unwrap());

        let built = persistence.build(&source).unwrap();
        assert_eq!(built.origin, IndexOrigin::Built);
        assert_eq!(built.registry.len(), 2);
        assert_eq!(built.symbols.document_count(), 2);
        assert!(persistence.exists());
        assert!(!persistence.is_stale(&source).unwrap());

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.origin, IndexOrigin::Snapshot);
        assert_eq!(loaded.index, built.index);
        assert_eq!(loaded.metadata.checksum, built.metadata.checksum);
        assert!(loaded.registry.lookup("pkg.Thing").is_some());
    }

    #[test]
    fn test_load_or_build_detects_changes() {
        let (_temp_dir, source, persistence) = setup();

        let first = persistence.load_or_build(&source, false).unwrap();
        assert_eq!(first.origin, IndexOrigin::Built);
        drop(first);

        let second = persistence.load_or_build(&source, false).unwrap();
        assert_eq!(second.origin, IndexOrigin::Snapshot);
        drop(second);

        // Regenerated docs: one more class.
        fs::write(&source, SOURCE.replace(r#"Thing:[0,1,1,""]"#, r#"Thing:[0,1,1,""],Other:[0,1,1,""]"#)).unwrap();
        assert!(persistence.is_stale(&source).unwrap());
        let third = persistence.load_or_build(&source, false).unwrap();
        assert_eq!(third.origin, IndexOrigin::Built);
        assert_eq!(third.registry.len(), 3);
        assert_eq!(third.symbols.document_count(), 3);
        drop(third);

        let forced = persistence.load_or_build(&source, true).unwrap();
        assert_eq!(forced.origin, IndexOrigin::Built);
    }

    #[test]
    fn test_invalid_source_keeps_nothing() {
        let (_temp_dir, source, persistence) = setup();
        fs::write(&source, "Search.setIndex({docnames:[").unwrap();
        assert!(matches!(
            persistence.build(&source),
            Err(StorageError::Index(IndexError::Parse(_)))
        ));
        assert!(!persistence.exists());
    }

    #[test]
    fn test_load_without_index() {
        let (_temp_dir, _source, persistence) = setup();
        assert!(matches!(persistence.load(), Err(StorageError::NotIndexed(_))));
    }

    #[test]
    fn test_clear() {
        let (_temp_dir, source, persistence) = setup();
        persistence.build(&source).unwrap();
        persistence.clear().unwrap();
        assert!(!persistence.exists());
        assert!(persistence.metadata().unwrap().is_none());
    }
}
