//! `comfy-table` layouts for `list`, `docs` and `stats`.

use std::collections::BTreeMap;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::registry::SymbolRecord;

/// Table with the shared preset and the given header row.
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

pub fn symbols_table(records: &[&SymbolRecord]) -> Table {
    let mut table = create_table(&["Name", "Kind", "Document", "Anchor"]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.full_name),
            Cell::new(&record.kind.label),
            Cell::new(&record.docname),
            Cell::new(&record.anchor),
        ]);
    }
    table
}

/// One row per document: `(docname, title, filename, symbol count)`.
pub fn documents_table(rows: &[(&str, &str, &str, usize)]) -> Table {
    let mut table = create_table(&["Document", "Title", "File", "Symbols"]);
    for (docname, title, filename, symbols) in rows {
        table.add_row(vec![
            Cell::new(docname),
            Cell::new(title),
            Cell::new(filename),
            Cell::new(symbols).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn kind_counts_table(counts: &BTreeMap<String, usize>) -> Table {
    let mut table = create_table(&["Kind", "Symbols"]);
    for (kind, count) in counts {
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
