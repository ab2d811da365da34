//! Stats command - summarize the persisted index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{emit, load_index, report_storage_error};
use crate::config::Settings;
use crate::display::{Theme, kind_counts_table};
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::utils::format_timestamp;

#[derive(Debug, Serialize)]
pub struct IndexStats {
    pub source: PathBuf,
    pub index_dir: PathBuf,
    pub built_at: String,
    pub envversion: serde_json::Value,
    pub symbols: usize,
    pub documents: usize,
    pub terms: usize,
    pub title_terms: usize,
    /// Symbol count per qualified kind (`py:class`, ...).
    pub kinds: BTreeMap<String, usize>,
}

/// Run the stats command.
pub fn run(source: Option<&Path>, settings: &Settings, format: OutputFormat) -> ExitCode {
    let loaded = match load_index(settings, source) {
        Ok(loaded) => loaded,
        Err(e) => return report_storage_error(format, &e),
    };

    let mut kinds = BTreeMap::new();
    for record in loaded.registry.iter() {
        *kinds.entry(record.kind.qualified()).or_insert(0) += 1;
    }

    let stats = IndexStats {
        source: loaded.metadata.source.clone(),
        index_dir: settings.index_dir(),
        built_at: format_timestamp(loaded.metadata.built_at),
        envversion: loaded.index.envversion().clone(),
        symbols: loaded.registry.len(),
        documents: loaded.index.document_count(),
        terms: loaded.index.terms().len(),
        title_terms: loaded.index.titleterms().len(),
        kinds,
    };

    if format.is_json() {
        return emit(
            Envelope::success(stats)
                .with_entity_type(EntityType::Stats)
                .with_message("Index statistics"),
        );
    }

    println!("{}", Theme::header("Index Statistics:"));
    println!("{}", "=".repeat(50));
    println!("Source:       {}", stats.source.display());
    println!("Index:        {}", stats.index_dir.display());
    println!("Built:        {}", stats.built_at);
    println!("Env version:  {}", stats.envversion);
    println!("Documents:    {}", stats.documents);
    println!("Symbols:      {}", stats.symbols);
    println!("Terms:        {} ({} in titles)", stats.terms, stats.title_terms);
    println!();
    println!("{}", kind_counts_table(&stats.kinds));
    ExitCode::Success
}
