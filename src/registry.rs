//! Immutable symbol registry built from one search index generation pass.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{IndexError, IndexResult};
use crate::searchindex::SearchIndex;
use crate::types::{DocId, ObjTypeId, ObjectKind, Priority, SymbolId};

/// One documented symbol with its document and anchor resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRecord {
    pub id: SymbolId,
    pub full_name: String,
    pub prefix: String,
    pub name: String,
    pub doc: DocId,
    pub docname: String,
    pub title: String,
    pub objtype: ObjTypeId,
    pub kind: ObjectKind,
    pub priority: Priority,
    pub anchor: String,
}

impl SymbolRecord {
    /// Last dotted segment of the full name.
    pub fn short_name(&self) -> &str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(self.full_name.as_str())
    }

    /// Description shown next to search hits, e.g. `Python class, in Home`.
    pub fn description(&self) -> String {
        format!("{}, in {}", self.kind.label, self.title)
    }
}

/// Lookup tables over every symbol of a search index.
///
/// Built once and never mutated; regenerate the index and build a new
/// registry instead.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    records: Vec<SymbolRecord>,
    by_full_name: HashMap<String, SymbolId>,
    by_short_name: HashMap<String, Vec<SymbolId>>,
    by_prefix: HashMap<String, Vec<SymbolId>>,
}

impl SymbolRegistry {
    /// Build the registry. Ids are assigned in the index's sorted object order.
    pub fn build(index: &SearchIndex) -> IndexResult<Self> {
        let mut registry = Self {
            records: Vec::with_capacity(index.object_count()),
            ..Self::default()
        };

        for entry in index.objects() {
            let full_name = entry.full_name();
            let kind = index
                .object_kind(entry.objtype)
                .ok_or_else(|| IndexError::UnknownObjectType {
                    symbol: full_name.clone(),
                    objtype: entry.objtype,
                })?;
            let document = index
                .document(entry.doc)
                .ok_or_else(|| IndexError::UnknownDocument {
                    symbol: full_name.clone(),
                    doc: entry.doc,
                })?;

            if registry.by_full_name.contains_key(&full_name) {
                return Err(IndexError::DuplicateSymbol(full_name));
            }

            let next = u32::try_from(registry.records.len() + 1).map_err(|_| IndexError::IdOverflow)?;
            let id = SymbolId::new(next).ok_or(IndexError::IdOverflow)?;

            let record = SymbolRecord {
                id,
                anchor: entry.resolved_anchor(kind),
                full_name: full_name.clone(),
                prefix: entry.prefix.clone(),
                name: entry.name.clone(),
                doc: entry.doc,
                docname: document.docname.to_string(),
                title: document.title.to_string(),
                objtype: entry.objtype,
                kind: kind.clone(),
                priority: entry.priority,
            };

            registry
                .by_short_name
                .entry(record.short_name().to_string())
                .or_default()
                .push(id);
            registry
                .by_prefix
                .entry(record.prefix.clone())
                .or_default()
                .push(id);
            registry.by_full_name.insert(full_name, id);
            registry.records.push(record);
        }

        tracing::debug!(
            target: "index",
            "built symbol registry with {} symbols",
            registry.records.len()
        );
        Ok(registry)
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolRecord> {
        self.records.get(id.value() as usize - 1)
    }

    /// Exact, case-sensitive lookup by fully qualified name.
    pub fn lookup(&self, full_name: &str) -> Option<&SymbolRecord> {
        self.by_full_name.get(full_name).and_then(|id| self.get(*id))
    }

    /// Every symbol whose last dotted segment equals `name`.
    pub fn find_by_name(&self, name: &str) -> Vec<&SymbolRecord> {
        self.resolve(self.by_short_name.get(name))
    }

    /// Direct members of a module or class.
    pub fn children(&self, prefix: &str) -> Vec<&SymbolRecord> {
        self.resolve(self.by_prefix.get(prefix))
    }

    /// Symbols of one role (`class`, `method`, ...).
    pub fn by_kind(&self, role: &str) -> Vec<&SymbolRecord> {
        self.records.iter().filter(|r| r.kind.role == role).collect()
    }

    pub fn in_document(&self, doc: DocId) -> Vec<&SymbolRecord> {
        self.records.iter().filter(|r| r.doc == doc).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolRecord> + '_ {
        self.records.iter()
    }

    /// Symbol count per role, sorted by role.
    pub fn kind_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.kind.role.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn resolve(&self, ids: Option<&Vec<SymbolId>>) -> Vec<&SymbolRecord> {
        ids.map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchindex::parse_search_index;

    fn registry() -> SymbolRegistry {
        let index = parse_search_index(
            r#"Search.setIndex({docnames:["api","guide"],filenames:["api.rst","guide.rst"],titles:["API","Guide"],
            objects:{"":{shapes:[0,0,0,"-"]},"shapes":{Circle:[0,1,1,""],Square:[0,1,1,""],area:[1,4,1,""]},
            "shapes.Circle":{area:[0,2,1,""],radius:[0,3,1,""]},"shapes.Square":{area:[0,2,-1,""]}},
            objnames:{"0":["py","module","Python module"],"1":["py","class","Python class"],"2":["py","method","Python method"],"3":["py","attribute","Python attribute"],"4":["py","function","Python function"]},
            terms:{},titleterms:{}})"#,
        )
        .unwrap();
        SymbolRegistry::build(&index).unwrap()
    }

    #[test]
    fn test_build_assigns_ids_in_order() {
        let registry = registry();
        assert_eq!(registry.len(), 7);
        assert!(!registry.is_empty());

        let first = registry.get(SymbolId::new(1).unwrap()).unwrap();
        assert_eq!(first.full_name, "shapes");
        assert_eq!(first.anchor, "module-shapes");

        let ids: Vec<u32> = registry.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());
        assert!(registry.get(SymbolId::new(8).unwrap()).is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = registry();
        let circle = registry.lookup("shapes.Circle").unwrap();
        assert_eq!(circle.kind.role, "class");
        assert_eq!(circle.docname, "api");
        assert_eq!(circle.anchor, "shapes.Circle");
        assert_eq!(circle.description(), "Python class, in API");

        assert!(registry.lookup("shapes.circle").is_none());
        assert!(registry.lookup("Circle").is_none());
    }

    #[test]
    fn test_find_by_name() {
        let registry = registry();
        let names: Vec<_> = registry
            .find_by_name("area")
            .iter()
            .map(|r| r.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["shapes.area", "shapes.Circle.area", "shapes.Square.area"]);
    }

    #[test]
    fn test_children_and_filters() {
        let registry = registry();
        let members: Vec<_> = registry
            .children("shapes.Circle")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(members, vec!["area", "radius"]);
        assert!(registry.children("shapes.Triangle").is_empty());

        assert_eq!(registry.by_kind("method").len(), 2);
        assert_eq!(registry.in_document(DocId::new(1)).len(), 1);

        let counts = registry.kind_counts();
        assert_eq!(counts.get("class"), Some(&2));
        assert_eq!(counts.get("module"), Some(&1));
        assert_eq!(counts.keys().next().map(String::as_str), Some("attribute"));
    }

    #[test]
    fn test_hidden_priority_kept() {
        let registry = registry();
        let hidden = registry.lookup("shapes.Square.area").unwrap();
        assert!(hidden.priority.is_hidden());
    }

    #[test]
    fn test_duplicate_rejected() {
        let index = parse_search_index(
            r#"{docnames:["a"],filenames:["a.rst"],titles:["A"],terms:{},
            objects:{"pkg":{Thing:[0,0,1,""]},"":{"pkg.Thing":[0,0,1,""]}},
            objnames:{"0":["py","class","Python class"]}}"#,
        )
        .unwrap();
        assert!(matches!(
            SymbolRegistry::build(&index),
            Err(IndexError::DuplicateSymbol(name)) if name == "pkg.Thing"
        ));
    }
}
