//! List and Docs commands - enumerate symbols and documents.

use std::path::Path;

use serde::Serialize;

use super::{emit, open_engine};
use crate::config::Settings;
use crate::display::{documents_table, symbols_table};
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::registry::SymbolRecord;

/// Registry filters; unset filters match everything.
#[derive(Debug, Default)]
pub struct ListFilter {
    /// Role (`class`) or qualified kind (`py:class`).
    pub kind: Option<String>,
    pub doc: Option<String>,
    /// Dotted name the symbols are defined under.
    pub prefix: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, record: &SymbolRecord) -> bool {
        let kind_ok = self
            .kind
            .as_deref()
            .is_none_or(|kind| record.kind.role == kind || record.kind.qualified() == kind);
        let doc_ok = self.doc.as_deref().is_none_or(|doc| record.docname == doc);
        let prefix_ok = self.prefix.as_deref().is_none_or(|prefix| {
            record.prefix == prefix
                || record
                    .prefix
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.'))
        });
        kind_ok && doc_ok && prefix_ok
    }

    fn is_empty(&self) -> bool {
        self.kind.is_none() && self.doc.is_none() && self.prefix.is_none()
    }
}

/// Run the list command.
pub fn run_list(
    filter: ListFilter,
    source: Option<&Path>,
    settings: &Settings,
    format: OutputFormat,
) -> ExitCode {
    let engine = match open_engine(settings, source, format) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let symbols: Vec<&SymbolRecord> = engine
        .registry()
        .iter()
        .filter(|record| filter.matches(record))
        .collect();

    if symbols.is_empty() {
        let message = if filter.is_empty() {
            "The index contains no symbols".to_string()
        } else {
            "No symbols match the given filters".to_string()
        };
        if format.is_json() {
            return emit(Envelope::<()>::not_found(message).with_entity_type(EntityType::Symbol));
        }
        eprintln!("{message}");
        return ExitCode::NotFound;
    }

    if format.is_json() {
        let count = symbols.len();
        return emit(
            Envelope::success(symbols)
                .with_entity_type(EntityType::Symbol)
                .with_count(count)
                .with_message(format!("Found {count} symbol(s)")),
        );
    }

    println!("{}", symbols_table(&symbols));
    println!("{} symbol(s)", symbols.len());
    ExitCode::Success
}

/// One document of the index.
#[derive(Debug, Serialize)]
pub struct DocumentSummary<'a> {
    pub id: u32,
    pub docname: &'a str,
    pub filename: &'a str,
    pub title: &'a str,
    pub symbols: usize,
}

/// Run the docs command.
pub fn run_docs(source: Option<&Path>, settings: &Settings, format: OutputFormat) -> ExitCode {
    let engine = match open_engine(settings, source, format) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let documents: Vec<DocumentSummary<'_>> = engine
        .index()
        .documents()
        .map(|doc| DocumentSummary {
            id: doc.id.value(),
            docname: doc.docname,
            filename: doc.filename,
            title: doc.title,
            symbols: engine.registry().in_document(doc.id).len(),
        })
        .collect();

    if format.is_json() {
        let count = documents.len();
        return emit(
            Envelope::success(documents)
                .with_entity_type(EntityType::Document)
                .with_count(count)
                .with_message(format!("{count} document(s)")),
        );
    }

    let rows: Vec<_> = documents
        .iter()
        .map(|doc| (doc.docname, doc.title, doc.filename, doc.symbols))
        .collect();
    println!("{}", documents_table(&rows));
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchEngine;
    use crate::searchindex::parse_search_index;

    fn engine() -> SearchEngine {
        let index = parse_search_index(
            r#"{docnames:["api","model"],envversion:51,filenames:["api.rst","model.rst"],
            titles:["API","Model"],terms:{},titleterms:{},
            objects:{"":{pkg:[0,0,0,"-"],"pkg.sub":[1,0,0,"-"]},
                     "pkg":{Thing:[0,1,1,""]},"pkg.sub":{Item:[1,1,1,""]}},
            objnames:{"0":["py","module","Python module"],"1":["py","class","Python class"]}}"#,
        )
        .unwrap();
        SearchEngine::new(index).unwrap()
    }

    fn names(engine: &SearchEngine, filter: &ListFilter) -> Vec<String> {
        engine
            .registry()
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| record.full_name.clone())
            .collect()
    }

    #[test]
    fn test_filter_by_kind() {
        let engine = engine();
        let by_role = ListFilter {
            kind: Some("class".to_string()),
            ..ListFilter::default()
        };
        let by_qualified = ListFilter {
            kind: Some("py:class".to_string()),
            ..ListFilter::default()
        };
        assert_eq!(names(&engine, &by_role), vec!["pkg.Thing", "pkg.sub.Item"]);
        assert_eq!(names(&engine, &by_qualified), names(&engine, &by_role));
    }

    #[test]
    fn test_filter_by_prefix_includes_nested() {
        let engine = engine();
        let filter = ListFilter {
            prefix: Some("pkg".to_string()),
            ..ListFilter::default()
        };
        assert_eq!(names(&engine, &filter), vec!["pkg.Thing", "pkg.sub.Item"]);

        let partial = ListFilter {
            prefix: Some("pk".to_string()),
            ..ListFilter::default()
        };
        assert!(names(&engine, &partial).is_empty());
    }

    #[test]
    fn test_filter_by_document() {
        let engine = engine();
        let filter = ListFilter {
            doc: Some("model".to_string()),
            ..ListFilter::default()
        };
        assert_eq!(names(&engine, &filter), vec!["pkg.sub", "pkg.sub.Item"]);
        assert!(ListFilter::default().matches(engine.registry().lookup("pkg").unwrap()));
    }
}
