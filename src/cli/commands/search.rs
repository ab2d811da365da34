//! Search command - combined object and full-text search.

use std::path::Path;

use super::{emit, open_engine};
use crate::config::Settings;
use crate::display::Theme;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::search::{HitKind, SearchOptions};

/// Filters given on the command line.
#[derive(Debug, Default)]
pub struct SearchArgs<'a> {
    pub query: &'a str,
    pub limit: Option<usize>,
    pub kind: Option<String>,
    pub doc: Option<String>,
    pub source: Option<&'a Path>,
}

/// Run the search command.
pub fn run(args: SearchArgs<'_>, settings: &Settings, format: OutputFormat) -> ExitCode {
    let engine = match open_engine(settings, args.source, format) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let options = SearchOptions {
        limit: Some(args.limit.unwrap_or(settings.search.default_limit)),
        kind: args.kind,
        document: args.doc,
    };
    let results = engine.search(args.query, &options);

    if results.hits.is_empty() {
        if format.is_json() {
            return emit(
                Envelope::<()>::not_found(format!("No results for '{}'", args.query))
                    .with_entity_type(EntityType::SearchResult)
                    .with_query(args.query)
                    .with_hint("Try 'docdex fuzzy <name>' for typo-tolerant symbol lookup"),
            );
        }
        eprintln!("No results for '{}'", args.query);
        return ExitCode::NotFound;
    }

    let shown = results.hits.len();
    let message = format!("Found {} result(s), showing {shown}", results.total);

    if format.is_json() {
        let total = results.total;
        return emit(
            Envelope::success(results)
                .with_entity_type(EntityType::SearchResult)
                .with_count(shown)
                .with_total(total, shown)
                .with_query(args.query)
                .with_message(message),
        );
    }

    println!("{}\n", Theme::header(&message));
    for (rank, hit) in results.hits.iter().enumerate() {
        let detail = match hit.kind {
            HitKind::Object => hit.description.clone().unwrap_or_default(),
            HitKind::Document => "page".to_string(),
        };
        println!(
            "{:>3}. {}  {}",
            rank + 1,
            Theme::name(&hit.name),
            Theme::dim(&detail)
        );
        println!("     {}", hit.location());
    }
    ExitCode::Success
}
