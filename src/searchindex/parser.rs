//! Parser for `searchindex.js`.
//!
//! The generator writes a JavaScript object literal (unquoted identifier
//! keys, quoted keywords) wrapped in a `Search.setIndex(...)` call. Once the
//! wrapper is stripped the literal is valid JSON5.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::model::{ObjectEntry, SearchIndex};
use crate::error::{IndexError, IndexResult};
use crate::types::{DocId, ObjTypeId, ObjectKind, Priority};

const WRAPPER_OPEN: &str = "Search.setIndex(";

/// Doc references in `terms`/`titleterms`: a single id or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocs {
    One(u32),
    Many(Vec<u32>),
}

impl RawDocs {
    fn into_doc_ids(self) -> Vec<DocId> {
        match self {
            RawDocs::One(doc) => vec![DocId::new(doc)],
            RawDocs::Many(docs) => docs.into_iter().map(DocId::new).collect(),
        }
    }
}

/// Map entries in input order, repeated keys included.
///
/// Deserializing into a map would keep only the last value of a repeated key.
#[derive(Debug)]
struct Entries<V>(Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    docnames: Vec<String>,
    #[serde(default)]
    envversion: serde_json::Value,
    filenames: Vec<String>,
    #[serde(default)]
    objects: Entries<Entries<Vec<serde_json::Value>>>,
    #[serde(default)]
    objnames: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    objtypes: BTreeMap<String, String>,
    #[serde(default)]
    terms: BTreeMap<String, RawDocs>,
    titles: Vec<String>,
    #[serde(default)]
    titleterms: BTreeMap<String, RawDocs>,
}

/// Parse the contents of a `searchindex.js` file.
///
/// Accepts the `Search.setIndex({...})` wrapper (with or without a trailing
/// `;`) or a bare object literal.
pub fn parse_search_index(text: &str) -> IndexResult<SearchIndex> {
    let payload = strip_wrapper(text)?;
    let raw: RawIndex =
        serde_json5::from_str(payload).map_err(|e| IndexError::Parse(e.to_string()))?;
    normalize(raw)
}

fn strip_wrapper(text: &str) -> IndexResult<&str> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();

    if let Some(rest) = trimmed.strip_prefix(WRAPPER_OPEN) {
        let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
        return rest
            .strip_suffix(')')
            .ok_or_else(|| IndexError::Parse(format!("missing ')' to close {WRAPPER_OPEN}")));
    }

    if trimmed.starts_with('{') {
        Ok(trimmed)
    } else {
        Err(IndexError::Parse(format!(
            "expected {WRAPPER_OPEN}...) or an object literal"
        )))
    }
}

fn parse_objtype_key(key: &str) -> IndexResult<u32> {
    key.parse::<u32>()
        .map_err(|_| IndexError::Parse(format!("invalid object type code '{key}'")))
}

fn normalize(raw: RawIndex) -> IndexResult<SearchIndex> {
    let mut objtypes = BTreeMap::new();
    for (key, qualified) in raw.objtypes {
        objtypes.insert(parse_objtype_key(&key)?, qualified);
    }

    let mut objnames = BTreeMap::new();
    for (key, parts) in raw.objnames {
        let code = parse_objtype_key(&key)?;
        let [domain, role, label]: [String; 3] = parts.try_into().map_err(|parts: Vec<String>| {
            IndexError::Parse(format!(
                "objnames entry '{key}' has {} fields, expected 3",
                parts.len()
            ))
        })?;
        objnames.insert(code, ObjectKind::new(domain, role, label));
    }

    // Older generators only wrote `objtypes`; derive a kind from "domain:role".
    for (code, qualified) in &objtypes {
        if !objnames.contains_key(code) {
            let (domain, role) = qualified.split_once(':').unwrap_or(("", qualified.as_str()));
            objnames.insert(*code, ObjectKind::new(domain, role, role));
        }
    }

    // Repeated keys, in one table or across a repeated prefix table, are errors.
    let mut objects = Vec::new();
    let mut seen = HashSet::new();
    for (prefix, names) in raw.objects.0 {
        for (name, fields) in names.0 {
            if !seen.insert((prefix.clone(), name.clone())) {
                return Err(IndexError::DuplicateSymbol(qualify(&prefix, &name)));
            }
            objects.push(object_entry(&prefix, name, &fields)?);
        }
    }
    objects.sort_by(|a, b| (&a.prefix, &a.name).cmp(&(&b.prefix, &b.name)));

    let terms = raw
        .terms
        .into_iter()
        .map(|(term, docs)| (term, docs.into_doc_ids()))
        .collect();
    let titleterms = raw
        .titleterms
        .into_iter()
        .map(|(term, docs)| (term, docs.into_doc_ids()))
        .collect();

    Ok(SearchIndex {
        docnames: raw.docnames,
        filenames: raw.filenames,
        titles: raw.titles,
        envversion: raw.envversion,
        objects,
        objtypes,
        objnames,
        terms,
        titleterms,
    })
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn object_entry(prefix: &str, name: String, fields: &[serde_json::Value]) -> IndexResult<ObjectEntry> {
    let invalid = |reason: &str| IndexError::InvalidEntry {
        symbol: qualify(prefix, &name),
        reason: reason.to_string(),
    };

    if fields.len() < 3 {
        return Err(invalid("expected [doc, objtype, priority, anchor]"));
    }

    let doc = fields[0]
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid("document id is not a non-negative integer"))?;
    let objtype = fields[1]
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid("object type is not a non-negative integer"))?;
    let priority = fields[2]
        .as_i64()
        .ok_or_else(|| invalid("priority is not an integer"))?;
    let anchor = match fields.get(3) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(anchor)) => anchor.clone(),
        Some(_) => return Err(invalid("anchor is not a string")),
    };

    Ok(ObjectEntry {
        prefix: prefix.to_string(),
        name,
        doc: DocId::new(doc),
        objtype: ObjTypeId::new(objtype),
        priority: Priority::from_code(priority),
        anchor,
    })
}
