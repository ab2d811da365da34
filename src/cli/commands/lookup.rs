//! Lookup and Fuzzy commands - find symbols by name.

use std::path::Path;

use super::{emit, open_engine, report_storage_error};
use crate::config::Settings;
use crate::display::Theme;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::registry::SymbolRecord;

/// Exact lookup by full name, falling back to last-segment matches.
pub fn run_lookup(
    name: &str,
    source: Option<&Path>,
    settings: &Settings,
    format: OutputFormat,
) -> ExitCode {
    let engine = match open_engine(settings, source, format) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let registry = engine.registry();

    let (symbols, exact) = match registry.lookup(name) {
        Some(symbol) => (vec![symbol], true),
        None => {
            let short = name.rsplit('.').next().unwrap_or(name);
            (registry.find_by_name(short), false)
        }
    };

    if symbols.is_empty() {
        return not_found(name, format);
    }

    let message = if exact {
        format!("Found symbol '{name}'")
    } else {
        format!(
            "No exact match for '{name}'; {} symbol(s) share its last name segment",
            symbols.len()
        )
    };

    if format.is_json() {
        let count = symbols.len();
        return emit(
            Envelope::success(symbols)
                .with_entity_type(EntityType::Symbol)
                .with_count(count)
                .with_query(name)
                .with_message(message),
        );
    }

    if !exact {
        println!("{message}:\n");
    }
    for symbol in symbols {
        print_symbol(symbol);
    }
    ExitCode::Success
}

/// Typo-tolerant lookup through the tantivy symbol index.
pub fn run_fuzzy(
    name: &str,
    limit: Option<usize>,
    source: Option<&Path>,
    settings: &Settings,
    format: OutputFormat,
) -> ExitCode {
    let engine = match open_engine(settings, source, format) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let limit = limit.unwrap_or(settings.search.default_limit);
    let matches = match engine.fuzzy(name, limit) {
        Ok(matches) => matches,
        Err(e) => return report_storage_error(format, &e),
    };

    if matches.is_empty() {
        return not_found(name, format);
    }

    if format.is_json() {
        let count = matches.len();
        return emit(
            Envelope::success(matches)
                .with_entity_type(EntityType::Symbol)
                .with_count(count)
                .with_query(name)
                .with_message(format!("Found {count} similar symbol(s)")),
        );
    }

    for found in &matches {
        println!(
            "{:>7.2}  {}  {}",
            found.score,
            Theme::name(&found.symbol.full_name),
            Theme::dim(&found.symbol.description())
        );
    }
    ExitCode::Success
}

fn print_symbol(symbol: &SymbolRecord) {
    println!(
        "{} {}",
        Theme::name(&symbol.full_name),
        Theme::dim(&format!("({})", symbol.kind.label))
    );
    println!("  document: {} ({})", symbol.docname, symbol.title);
    println!("  anchor:   {}#{}", symbol.docname, symbol.anchor);
    println!("  id:       {}", symbol.id.value());
    println!();
}

fn not_found(query: &str, format: OutputFormat) -> ExitCode {
    if format.is_json() {
        return emit(
            Envelope::<()>::not_found(format!("Symbol '{query}' not found"))
                .with_entity_type(EntityType::Symbol)
                .with_query(query)
                .with_hint("Try 'docdex fuzzy <name>' or 'docdex search <words>'"),
        );
    }
    eprintln!("Not found: '{query}'");
    ExitCode::NotFound
}
