//! Command implementations for the CLI.
//!
//! Each command lives in its own module and returns the process exit code.
//! Output goes through [`emit`] in JSON mode and straight to stdout otherwise;
//! errors are reported with [`report_error`].

pub mod index;
pub mod init;
pub mod list;
pub mod lookup;
pub mod search;
pub mod stats;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use crate::config::Settings;
use crate::io::{Envelope, ErrorDetails, ExitCode, OutputFormat, ResultCode};
use crate::search::SearchEngine;
use crate::storage::{IndexPersistence, LoadedIndex, StorageError};

/// Print a JSON envelope and return its exit code.
pub(crate) fn emit<T: Serialize>(envelope: Envelope<T>) -> ExitCode {
    match envelope.to_json() {
        Ok(json) => {
            println!("{json}");
            envelope.code.exit_code()
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {e}");
            ExitCode::GeneralError
        }
    }
}

/// Report an error as an envelope (JSON) or on stderr (text).
pub(crate) fn report_error(
    format: OutputFormat,
    code: ResultCode,
    message: impl Into<String>,
    hint: Option<&str>,
    details: Option<ErrorDetails>,
) -> ExitCode {
    let message = message.into();

    if format.is_json() {
        let mut envelope = Envelope::<()>::error(code, message);
        if let Some(hint) = hint {
            envelope = envelope.with_hint(hint);
        }
        if let Some(details) = details {
            envelope = envelope.with_error_details(details);
        }
        return emit(envelope);
    }

    eprintln!("Error: {message}");
    if let Some(hint) = hint {
        eprintln!("Hint: {hint}");
    }
    for suggestion in details.iter().flat_map(|d| &d.suggestions) {
        eprintln!("  - {suggestion}");
    }
    code.exit_code()
}

/// Map a storage failure to an envelope or stderr report.
pub(crate) fn report_storage_error(format: OutputFormat, err: &StorageError) -> ExitCode {
    tracing::debug!(target: "cli", "command failed: {err:?}");

    let details = match err {
        StorageError::Index(inner) => Some(ErrorDetails {
            suggestions: inner
                .recovery_suggestions()
                .into_iter()
                .map(String::from)
                .collect(),
            context: Some(json!({ "status": inner.status_code() })),
        }),
        _ => None,
    };
    let hint = match err {
        StorageError::NotIndexed(_) => Some("Run 'docdex index <searchindex.js>' first"),
        _ => None,
    };

    report_error(format, ResultCode::from(err), err.to_string(), hint, details)
}

/// Explicit `--source`, else `index.source` from the settings.
pub(crate) fn resolve_source(explicit: Option<&Path>, settings: &Settings) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| settings.index_source())
}

/// Load the persisted index, rebuilding it first when its source changed.
///
/// Without any configured source the file recorded at the last build is
/// used; if that file is gone the snapshot is served as is.
pub(crate) fn load_index(
    settings: &Settings,
    source: Option<&Path>,
) -> Result<LoadedIndex, StorageError> {
    let persistence = IndexPersistence::new(settings.index_dir());

    if let Some(source) = resolve_source(source, settings) {
        return persistence.load_or_build(&source, false);
    }

    match persistence.metadata()? {
        Some(metadata) if metadata.source.exists() => {
            persistence.load_or_build(&metadata.source, false)
        }
        _ => persistence.load(),
    }
}

/// Engine over a loaded index, configured from the settings.
pub(crate) fn engine(settings: &Settings, loaded: LoadedIndex) -> SearchEngine {
    SearchEngine::from_loaded(loaded)
        .with_query_config(settings.search.query_config())
        .with_weights(settings.search.scorer)
        .with_fuzzy_distance(settings.search.fuzzy_distance)
}

/// [`load_index`] followed by [`engine`], reporting failures.
pub(crate) fn open_engine(
    settings: &Settings,
    source: Option<&Path>,
    format: OutputFormat,
) -> Result<SearchEngine, ExitCode> {
    load_index(settings, source)
        .map(|loaded| engine(settings, loaded))
        .map_err(|e| report_storage_error(format, &e))
}
