//! Combined object and full-text search over one search index.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::query::{ParsedQuery, QueryConfig};
use super::scorer::ScorerWeights;
use crate::error::IndexResult;
use crate::registry::{SymbolRecord, SymbolRegistry};
use crate::searchindex::SearchIndex;
use crate::storage::{LoadedIndex, StorageResult, SymbolIndex};
use crate::types::{DocId, SymbolId};

/// Terms of at least this many characters allow two edits in fuzzy lookup.
const LONG_TERM_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// A documented object (module, class, method, ...).
    Object,
    /// A whole document matched by full-text terms.
    Document,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub kind: HitKind,
    pub docname: String,
    pub filename: String,
    pub title: String,
    /// Full name for objects, document title for documents.
    pub name: String,
    /// Empty for document hits.
    pub anchor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<SymbolId>,
    pub score: i64,
}

impl SearchHit {
    /// `docname#anchor`, or just `docname` for document hits.
    pub fn location(&self) -> String {
        if self.anchor.is_empty() {
            self.docname.clone()
        } else {
            format!("{}#{}", self.docname, self.anchor)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    /// Only objects of this role (`class`, `method`, ...).
    pub kind: Option<String>,
    /// Only hits in this document.
    pub document: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    /// Number of hits before `limit` was applied.
    pub total: usize,
    pub hits: Vec<SearchHit>,
    pub highlight_terms: Vec<String>,
}

/// Symbol matched by typo-tolerant lookup.
#[derive(Debug, Clone, Serialize)]
pub struct FuzzyMatch<'a> {
    pub symbol: &'a SymbolRecord,
    pub score: f32,
}

#[derive(Debug)]
pub struct SearchEngine {
    index: SearchIndex,
    registry: SymbolRegistry,
    query_config: QueryConfig,
    weights: ScorerWeights,
    fuzzy_distance: u8,
    symbols: Option<SymbolIndex>,
}

impl SearchEngine {
    /// Build an engine directly from a parsed index.
    pub fn new(index: SearchIndex) -> IndexResult<Self> {
        let registry = SymbolRegistry::build(&index)?;
        Ok(Self::from_parts(index, registry))
    }

    pub fn from_parts(index: SearchIndex, registry: SymbolRegistry) -> Self {
        Self {
            index,
            registry,
            query_config: QueryConfig::default(),
            weights: ScorerWeights::default(),
            fuzzy_distance: 1,
            symbols: None,
        }
    }

    /// Engine over a persisted index, using its tantivy symbol index.
    pub fn from_loaded(loaded: LoadedIndex) -> Self {
        Self::from_parts(loaded.index, loaded.registry).with_symbol_index(loaded.symbols)
    }

    pub fn with_query_config(mut self, config: QueryConfig) -> Self {
        self.query_config = config;
        self
    }

    pub fn with_weights(mut self, weights: ScorerWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_fuzzy_distance(mut self, distance: u8) -> Self {
        self.fuzzy_distance = distance;
        self
    }

    pub fn with_symbol_index(mut self, symbols: SymbolIndex) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn parse_query(&self, text: &str) -> ParsedQuery {
        ParsedQuery::parse(text, &self.query_config)
    }

    /// Objects whose lowercased full name contains `term`.
    ///
    /// Every entry of `others` must appear in the object's prefix, name,
    /// kind label or document title.
    pub fn search_objects(&self, term: &str, others: &[String]) -> Vec<SearchHit> {
        let term = term.to_lowercase();
        let mut hits = Vec::new();

        for record in self.registry.iter() {
            if record.priority.is_hidden() {
                continue;
            }

            let full_name = record.full_name.to_lowercase();
            if !full_name.contains(&term) {
                continue;
            }

            let short_name = record.short_name().to_lowercase();
            let mut score = 0;
            if full_name == term || short_name == term {
                score += self.weights.obj_name_match;
            } else if short_name.contains(&term) {
                score += self.weights.obj_partial_match;
            }

            if !others.is_empty() {
                let haystack = format!(
                    "{} {} {} {}",
                    record.prefix, record.name, record.kind.label, record.title
                )
                .to_lowercase();
                if !others.iter().all(|other| haystack.contains(other.as_str())) {
                    continue;
                }
            }

            score += self.weights.obj_prio(record.priority);
            hits.push(self.object_hit(record, score));
        }

        hits
    }

    /// Documents containing every stemmed term in `search` and none in `excluded`.
    pub fn search_terms(&self, search: &[String], excluded: &[String]) -> Vec<SearchHit> {
        if search.is_empty() {
            return Vec::new();
        }

        // doc -> (terms matched, best per-term score)
        let mut matched: BTreeMap<DocId, (usize, i64)> = BTreeMap::new();
        for term in search {
            let content = self.index.term_documents(term);
            let titles = self.index.title_documents(term);
            if content.is_empty() && titles.is_empty() {
                // Required term absent everywhere: no document can qualify.
                return Vec::new();
            }

            let mut term_scores: BTreeMap<DocId, i64> = BTreeMap::new();
            for doc in content {
                let score = term_scores.entry(*doc).or_insert(self.weights.term);
                *score = (*score).max(self.weights.term);
            }
            for doc in titles {
                let score = term_scores.entry(*doc).or_insert(self.weights.title);
                *score = (*score).max(self.weights.title);
            }

            for (doc, score) in term_scores {
                let entry = matched.entry(doc).or_insert((0, i64::MIN));
                entry.0 += 1;
                entry.1 = entry.1.max(score);
            }
        }

        matched
            .into_iter()
            .filter(|(_, (count, _))| *count == search.len())
            .filter(|(doc, _)| {
                !excluded.iter().any(|term| {
                    self.index.term_documents(term).contains(doc)
                        || self.index.title_documents(term).contains(doc)
                })
            })
            .filter_map(|(doc, (_, score))| {
                let document = self.index.document(doc)?;
                Some(SearchHit {
                    kind: HitKind::Document,
                    docname: document.docname.to_string(),
                    filename: document.filename.to_string(),
                    title: document.title.to_string(),
                    name: document.title.to_string(),
                    anchor: String::new(),
                    description: None,
                    role: None,
                    symbol_id: None,
                    score,
                })
            })
            .collect()
    }

    /// Object search for every word, then full-text search, merged and ranked.
    pub fn search(&self, text: &str, options: &SearchOptions) -> SearchResults {
        let query = self.parse_query(text);
        let mut hits = Vec::new();

        for (i, term) in query.object_terms.iter().enumerate() {
            let others: Vec<String> = query
                .object_terms
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| other.clone())
                .collect();
            hits.extend(self.search_objects(term, &others));
        }
        hits.extend(self.search_terms(&query.search_terms, &query.excluded_terms));

        hits.retain(|hit| {
            let kind_ok = options
                .kind
                .as_deref()
                .is_none_or(|kind| hit.role.as_deref() == Some(kind));
            let doc_ok = options
                .document
                .as_deref()
                .is_none_or(|doc| hit.docname == doc);
            kind_ok && doc_ok
        });

        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.docname.cmp(&b.docname))
                .then_with(|| a.anchor.cmp(&b.anchor))
        });

        // Sorted best-first, so the first occurrence of a location wins.
        let mut seen = HashSet::new();
        hits.retain(|hit| seen.insert((hit.docname.clone(), hit.anchor.clone())));

        let total = hits.len();
        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }

        tracing::debug!(
            target: "search",
            "query '{text}': {} object terms, {} search terms, {} excluded, {total} hits",
            query.object_terms.len(),
            query.search_terms.len(),
            query.excluded_terms.len()
        );

        SearchResults {
            query: text.to_string(),
            total,
            hits,
            highlight_terms: query.highlight_terms,
        }
    }

    /// Typo-tolerant symbol lookup.
    ///
    /// Uses the persisted symbol index when one is attached, otherwise an
    /// in-memory index built for this call.
    pub fn fuzzy(&self, name: &str, limit: usize) -> StorageResult<Vec<FuzzyMatch<'_>>> {
        let distance = if name.trim().chars().count() >= LONG_TERM_CHARS {
            2
        } else {
            self.fuzzy_distance
        };

        let hits = match &self.symbols {
            Some(symbols) => symbols.fuzzy_search(name, limit, None, distance)?,
            None => {
                let symbols = SymbolIndex::open_in_ram()?;
                symbols.rebuild(&self.registry)?;
                symbols.fuzzy_search(name, limit, None, distance)?
            }
        };

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let symbol = self.registry.get(hit.symbol_id)?;
                // Ignore entries from an index built for different contents.
                (symbol.full_name == hit.full_name).then_some(FuzzyMatch {
                    symbol,
                    score: hit.score,
                })
            })
            .collect())
    }

    fn object_hit(&self, record: &SymbolRecord, score: i64) -> SearchHit {
        let filename = self
            .index
            .document(record.doc)
            .map(|doc| doc.filename.to_string())
            .unwrap_or_default();

        SearchHit {
            kind: HitKind::Object,
            docname: record.docname.clone(),
            filename,
            title: record.title.clone(),
            name: record.full_name.clone(),
            anchor: record.anchor.clone(),
            description: Some(record.description()),
            role: Some(record.kind.role.clone()),
            symbol_id: Some(record.id),
            score,
        }
    }
}
