//! In-memory form of one search index generation pass.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::types::{DocId, ObjTypeId, ObjectKind, Priority};

/// A documented object, flattened out of the nested `objects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub prefix: String,
    pub name: String,
    pub doc: DocId,
    pub objtype: ObjTypeId,
    pub priority: Priority,
    pub anchor: String,
}

impl ObjectEntry {
    /// `prefix.name`, or just `name` for top-level objects.
    pub fn full_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.prefix, self.name)
        }
    }

    /// Anchor inside the rendered page.
    ///
    /// An empty anchor stands for the full name and `-` for
    /// `role-fullname`; anything else is used as written.
    pub fn resolved_anchor(&self, kind: &ObjectKind) -> String {
        match self.anchor.as_str() {
            "" => self.full_name(),
            "-" => format!("{}-{}", kind.role, self.full_name()),
            other => other.to_string(),
        }
    }
}

/// Borrowed view of one row of the document tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef<'a> {
    pub id: DocId,
    pub docname: &'a str,
    pub filename: &'a str,
    pub title: &'a str,
}

/// A parsed search index.
///
/// Objects are kept sorted by prefix, then name, so iteration order and the
/// ids handed out by the registry do not depend on the file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub(crate) docnames: Vec<String>,
    pub(crate) filenames: Vec<String>,
    pub(crate) titles: Vec<String>,
    pub(crate) envversion: serde_json::Value,
    pub(crate) objects: Vec<ObjectEntry>,
    pub(crate) objtypes: BTreeMap<u32, String>,
    pub(crate) objnames: BTreeMap<u32, ObjectKind>,
    pub(crate) terms: BTreeMap<String, Vec<DocId>>,
    pub(crate) titleterms: BTreeMap<String, Vec<DocId>>,
}

impl SearchIndex {
    /// Read and parse a `searchindex.js` file.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let index = super::parse_search_index(&text)?;
        tracing::debug!(
            target: "index",
            "loaded {} ({} documents, {} objects, {} terms)",
            path.display(),
            index.document_count(),
            index.object_count(),
            index.terms.len()
        );
        Ok(index)
    }

    /// Check cross-table references and key uniqueness.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> IndexResult<()> {
        let count = self.docnames.len();
        if self.filenames.len() != count || self.titles.len() != count {
            return Err(IndexError::DocumentTables {
                docnames: count,
                filenames: self.filenames.len(),
                titles: self.titles.len(),
            });
        }

        for entry in &self.objects {
            if entry.doc.as_index() >= count {
                return Err(IndexError::UnknownDocument {
                    symbol: entry.full_name(),
                    doc: entry.doc,
                });
            }
            if !self.objnames.contains_key(&entry.objtype.value()) {
                return Err(IndexError::UnknownObjectType {
                    symbol: entry.full_name(),
                    objtype: entry.objtype,
                });
            }
        }

        for (term, docs) in self.terms.iter().chain(self.titleterms.iter()) {
            if let Some(doc) = docs.iter().find(|doc| doc.as_index() >= count) {
                return Err(IndexError::UnknownTermDocument {
                    term: term.clone(),
                    doc: *doc,
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.objects.len());
        for entry in &self.objects {
            let full_name = entry.full_name();
            if !seen.insert(full_name.clone()) {
                return Err(IndexError::DuplicateSymbol(full_name));
            }
        }

        Ok(())
    }

    pub fn document(&self, id: DocId) -> Option<DocumentRef<'_>> {
        let i = id.as_index();
        Some(DocumentRef {
            id,
            docname: self.docnames.get(i)?,
            filename: self.filenames.get(i)?,
            title: self.titles.get(i)?,
        })
    }

    /// Documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = DocumentRef<'_>> + '_ {
        (0..self.docnames.len()).filter_map(|i| self.document(DocId::new(i as u32)))
    }

    /// Find a document id by its docname.
    pub fn document_id(&self, docname: &str) -> Option<DocId> {
        self.docnames
            .iter()
            .position(|name| name == docname)
            .map(|i| DocId::new(i as u32))
    }

    pub fn document_count(&self) -> usize {
        self.docnames.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object_kind(&self, objtype: ObjTypeId) -> Option<&ObjectKind> {
        self.objnames.get(&objtype.value())
    }

    /// Every object, sorted by prefix then name.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectEntry> + '_ {
        self.objects.iter()
    }

    pub fn envversion(&self) -> &serde_json::Value {
        &self.envversion
    }

    pub fn terms(&self) -> &BTreeMap<String, Vec<DocId>> {
        &self.terms
    }

    pub fn titleterms(&self) -> &BTreeMap<String, Vec<DocId>> {
        &self.titleterms
    }

    /// Documents whose content contains the stemmed `term`.
    pub fn term_documents(&self, term: &str) -> &[DocId] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Documents whose title contains the stemmed `term`.
    pub fn title_documents(&self, term: &str) -> &[DocId] {
        self.titleterms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }
}
