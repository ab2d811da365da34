//! Index command - build the persisted index from a searchindex.js file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{emit, report_error, report_storage_error, resolve_source};
use crate::config::Settings;
use crate::display::Theme;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat, ResultCode};
use crate::storage::{IndexOrigin, IndexPersistence};

/// What `docdex index` did.
#[derive(Debug, Serialize)]
pub struct IndexSummary {
    pub source: PathBuf,
    pub index_dir: PathBuf,
    /// False when the persisted index was already up to date.
    pub rebuilt: bool,
    pub symbols: u32,
    pub documents: u32,
    pub terms: u32,
    pub checksum: String,
}

/// Run the index command.
pub fn run(
    source: Option<&Path>,
    force: bool,
    settings: &Settings,
    format: OutputFormat,
) -> ExitCode {
    let Some(source) = resolve_source(source, settings) else {
        return report_error(
            format,
            ResultCode::ConfigError,
            "No searchindex.js given",
            Some("Pass the file as an argument or set index.source in .docdex/settings.toml"),
            None,
        );
    };
    // Recorded in the metadata; later commands may run from elsewhere.
    let source = source.canonicalize().unwrap_or(source);

    let persistence = IndexPersistence::new(settings.index_dir());
    let loaded = match persistence.load_or_build(&source, force) {
        Ok(loaded) => loaded,
        Err(e) => return report_storage_error(format, &e),
    };

    let summary = IndexSummary {
        source,
        index_dir: persistence.base_path().to_path_buf(),
        rebuilt: loaded.origin == IndexOrigin::Built,
        symbols: loaded.metadata.symbol_count,
        documents: loaded.metadata.document_count,
        terms: loaded.metadata.term_count,
        checksum: loaded.metadata.checksum.clone(),
    };
    tracing::info!(
        target: "cli",
        "index {}: {} symbols, rebuilt={}",
        summary.source.display(),
        summary.symbols,
        summary.rebuilt
    );

    let message = if summary.rebuilt {
        format!(
            "Indexed {} symbols from {} documents",
            summary.symbols, summary.documents
        )
    } else {
        "Index is up to date".to_string()
    };

    if format.is_json() {
        return emit(
            Envelope::success(summary)
                .with_entity_type(EntityType::IndexSummary)
                .with_message(message),
        );
    }

    println!("{message}");
    println!("  {} {}", Theme::dim("source:"), summary.source.display());
    println!("  {} {}", Theme::dim("index: "), summary.index_dir.display());
    if !summary.rebuilt {
        println!("Use --force to rebuild anyway.");
    }
    ExitCode::Success
}
