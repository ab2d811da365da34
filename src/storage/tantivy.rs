//! Tantivy-backed symbol index for typo-tolerant name lookup.
//!
//! The index mirrors the symbol registry and is always rebuilt as a whole:
//! a regenerated search index replaces every document in one commit.

use std::path::{Path, PathBuf};

use tantivy::{
    Index, IndexReader, IndexSettings, ReloadPolicy, TantivyDocument as Document, Term,
    collector::TopDocs,
    directory::MmapDirectory,
    query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery},
    schema::{
        FAST, Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TextFieldIndexing,
        TextOptions, Value,
    },
};

use super::{StorageError, StorageResult};
use crate::registry::SymbolRegistry;
use crate::types::SymbolId;

const WRITER_HEAP_BYTES: usize = 50_000_000;
const MAX_FUZZY_DISTANCE: u8 = 2;

/// Schema fields for the symbol index
#[derive(Debug, Clone, Copy)]
pub struct SymbolSchema {
    pub symbol_id: Field,
    pub full_name: Field,
    /// Lowercased last segment, indexed as a single term.
    pub name_exact: Field,
    /// Last segment split into words (`check_states` -> `check`, `states`).
    pub name: Field,
    pub kind: Field,
    pub docname: Field,
}

impl SymbolSchema {
    pub fn build() -> (Schema, SymbolSchema) {
        let mut builder = SchemaBuilder::default();

        let symbol_id = builder.add_u64_field("symbol_id", STORED | FAST);
        let full_name = builder.add_text_field("full_name", STRING | STORED);
        let name_exact = builder.add_text_field("name_exact", STRING);

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer("default")
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let name = builder.add_text_field("name", text_options);

        let kind = builder.add_text_field("kind", STRING | STORED);
        let docname = builder.add_text_field("docname", STRING | STORED);

        let schema = builder.build();
        (
            schema,
            SymbolSchema {
                symbol_id,
                full_name,
                name_exact,
                name,
                kind,
                docname,
            },
        )
    }

    /// Resolve fields from an existing index's schema.
    fn from_schema(schema: &Schema) -> StorageResult<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| StorageError::SchemaError(format!("missing field '{name}'")))
        };
        Ok(Self {
            symbol_id: field("symbol_id")?,
            full_name: field("full_name")?,
            name_exact: field("name_exact")?,
            name: field("name")?,
            kind: field("kind")?,
            docname: field("docname")?,
        })
    }
}

/// A stored symbol matched by a fuzzy query.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolHit {
    pub symbol_id: SymbolId,
    pub full_name: String,
    pub kind: String,
    pub docname: String,
    pub score: f32,
}

pub struct SymbolIndex {
    index: Index,
    reader: IndexReader,
    schema: SymbolSchema,
    index_path: Option<PathBuf>,
}

impl std::fmt::Debug for SymbolIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolIndex")
            .field("index_path", &self.index_path)
            .field("schema", &self.schema)
            .finish()
    }
}

impl SymbolIndex {
    /// Open the index in `index_path`, creating it if needed.
    pub fn open(index_path: impl AsRef<Path>) -> StorageResult<Self> {
        let index_path = index_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&index_path)
            .map_err(|e| StorageError::file_access(&index_path, e))?;

        let (index, schema) = if index_path.join("meta.json").exists() {
            let index = Index::open_in_dir(&index_path)?;
            let schema = SymbolSchema::from_schema(&index.schema())?;
            (index, schema)
        } else {
            let (schema, fields) = SymbolSchema::build();
            let dir = MmapDirectory::open(&index_path)?;
            (Index::create(dir, schema, IndexSettings::default())?, fields)
        };

        Self::with_index(index, schema, Some(index_path))
    }

    /// Index held in memory only.
    pub fn open_in_ram() -> StorageResult<Self> {
        let (schema, fields) = SymbolSchema::build();
        let index = Index::create_in_ram(schema);
        Self::with_index(index, fields, None)
    }

    fn with_index(
        index: Index,
        schema: SymbolSchema,
        index_path: Option<PathBuf>,
    ) -> StorageResult<Self> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            schema,
            index_path,
        })
    }

    /// Replace every document with the contents of `registry`.
    pub fn rebuild(&self, registry: &SymbolRegistry) -> StorageResult<u64> {
        let mut writer = self.index.writer::<Document>(WRITER_HEAP_BYTES)?;
        writer.delete_all_documents()?;

        for record in registry.iter() {
            let mut doc = Document::new();
            doc.add_u64(self.schema.symbol_id, u64::from(record.id.value()));
            doc.add_text(self.schema.full_name, &record.full_name);
            doc.add_text(self.schema.name_exact, record.short_name().to_lowercase());
            doc.add_text(self.schema.name, record.short_name());
            doc.add_text(self.schema.kind, &record.kind.role);
            doc.add_text(self.schema.docname, &record.docname);
            writer.add_document(doc)?;
        }

        writer.commit()?;
        self.reader.reload()?;

        let count = self.document_count();
        tracing::debug!(target: "storage", "rebuilt symbol index with {count} documents");
        Ok(count)
    }

    /// Typo-tolerant lookup on symbol names.
    ///
    /// Matches the whole last segment within `distance` edits, or every word
    /// of it within `distance` edits each. Transpositions count as one edit.
    pub fn fuzzy_search(
        &self,
        text: &str,
        limit: usize,
        kind: Option<&str>,
        distance: u8,
    ) -> StorageResult<Vec<SymbolHit>> {
        let text = text.trim().to_lowercase();
        if text.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let distance = distance.min(MAX_FUZZY_DISTANCE);

        let whole: Box<dyn Query> = Box::new(FuzzyTermQuery::new(
            Term::from_field_text(self.schema.name_exact, &text),
            distance,
            true,
        ));

        let words: Vec<Box<dyn Query>> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| {
                let term = Term::from_field_text(self.schema.name, w);
                Box::new(FuzzyTermQuery::new(term, distance, true)) as Box<dyn Query>
            })
            .collect();

        let mut alternatives = vec![(Occur::Should, whole)];
        if !words.is_empty() {
            let all_words = words.into_iter().map(|q| (Occur::Must, q)).collect();
            alternatives.push((Occur::Should, Box::new(BooleanQuery::new(all_words)) as Box<dyn Query>));
        }
        let mut query: Box<dyn Query> = Box::new(BooleanQuery::new(alternatives));

        if let Some(kind) = kind {
            let term = Term::from_field_text(self.schema.kind, kind);
            let filter: Box<dyn Query> = Box::new(TermQuery::new(term, IndexRecordOption::Basic));
            query = Box::new(BooleanQuery::new(vec![
                (Occur::Must, query),
                (Occur::Must, filter),
            ]));
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&*query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: Document = searcher.doc(address)?;
            let symbol_id = doc
                .get_first(self.schema.symbol_id)
                .and_then(|v| v.as_u64())
                .and_then(|id| u32::try_from(id).ok())
                .and_then(SymbolId::new)
                .ok_or_else(|| StorageError::InvalidFieldValue {
                    field: "symbol_id".to_string(),
                    reason: "missing or out of range".to_string(),
                })?;
            let text_field = |field: Field| {
                doc.get_first(field)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };

            hits.push(SymbolHit {
                symbol_id,
                full_name: text_field(self.schema.full_name),
                kind: text_field(self.schema.kind),
                docname: text_field(self.schema.docname),
                score,
            });
        }

        tracing::debug!(
            target: "storage",
            "fuzzy '{text}' (distance {distance}) matched {} symbols",
            hits.len()
        );
        Ok(hits)
    }

    /// Get total number of indexed documents
    pub fn document_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Directory backing the index, `None` for in-memory indexes.
    pub fn path(&self) -> Option<&Path> {
        self.index_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchindex::parse_search_index;
    use tempfile::TempDir;

    fn registry() -> SymbolRegistry {
        let index = parse_search_index(
            r#"{docnames:["ca"],filenames:["ca.rst"],titles:["CA"],terms:{},
            objects:{"ca.rules":{AbstractRule:[0,1,1,""],check_states:[0,4,1,""]},"ca.rules.AbstractRule":{step:[0,2,1,""]}},
            objnames:{"1":["py","class","Python class"],"2":["py","method","Python method"],"4":["py","function","Python function"]}}"#,
        )
        .unwrap();
        SymbolRegistry::build(&index).unwrap()
    }

    #[test]
    fn test_symbol_index_creation() {
        let temp_dir = TempDir::new().unwrap();
        let index = SymbolIndex::open(temp_dir.path()).unwrap();
        assert_eq!(index.document_count(), 0);
        assert_eq!(index.path(), Some(temp_dir.path()));
    }

    #[test]
    fn test_rebuild_replaces_documents() {
        let index = SymbolIndex::open_in_ram().unwrap();
        let registry = registry();
        assert_eq!(index.rebuild(&registry).unwrap(), 3);
        // A second rebuild must not duplicate anything.
        assert_eq!(index.rebuild(&registry).unwrap(), 3);
    }

    #[test]
    fn test_fuzzy_search_with_typo() {
        let index = SymbolIndex::open_in_ram().unwrap();
        index.rebuild(&registry()).unwrap();

        let hits = index.fuzzy_search("AbstractRul", 10, None, 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "ca.rules.AbstractRule");
        assert_eq!(hits[0].kind, "class");

        let hits = index.fuzzy_search("chek_states", 10, None, 1).unwrap();
        assert_eq!(hits[0].full_name, "ca.rules.check_states");

        let hits = index.fuzzy_search("stpe", 10, None, 1).unwrap();
        assert_eq!(hits[0].full_name, "ca.rules.AbstractRule.step");
    }

    #[test]
    fn test_fuzzy_search_kind_filter() {
        let index = SymbolIndex::open_in_ram().unwrap();
        index.rebuild(&registry()).unwrap();

        assert!(index.fuzzy_search("step", 10, Some("class"), 1).unwrap().is_empty());
        assert_eq!(index.fuzzy_search("step", 10, Some("method"), 1).unwrap().len(), 1);
    }

    #[test]
    fn test_fuzzy_search_empty_input() {
        let index = SymbolIndex::open_in_ram().unwrap();
        index.rebuild(&registry()).unwrap();
        assert!(index.fuzzy_search("   ", 10, None, 1).unwrap().is_empty());
        assert!(index.fuzzy_search("step", 0, None, 1).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_persisted_index() {
        let temp_dir = TempDir::new().unwrap();
        {
            let index = SymbolIndex::open(temp_dir.path()).unwrap();
            index.rebuild(&registry()).unwrap();
        }
        let index = SymbolIndex::open(temp_dir.path()).unwrap();
        assert_eq!(index.document_count(), 3);
    }
}
