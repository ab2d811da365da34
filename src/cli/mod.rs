//! Command line interface of the `docdex` binary.
//!
//! Argument parsing lives in [`args`], command bodies in [`commands`];
//! [`run`] ties both together.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, SourceArgs};

use crate::config::Settings;
use crate::io::{ExitCode, OutputFormat};

/// Dispatch a parsed command.
pub fn run(command: Commands, settings: &Settings, format: OutputFormat) -> ExitCode {
    match command {
        Commands::Init { force } => commands::init::run_init(force, format),
        Commands::Config => commands::init::run_config(settings, format),
        Commands::Index { source, force } => {
            commands::index::run(source.as_deref(), force, settings, format)
        }
        Commands::Lookup { name, source } => {
            commands::lookup::run_lookup(&name, source.source.as_deref(), settings, format)
        }
        Commands::Fuzzy {
            name,
            limit,
            source,
        } => commands::lookup::run_fuzzy(&name, limit, source.source.as_deref(), settings, format),
        Commands::Search {
            query,
            limit,
            kind,
            doc,
            source,
        } => commands::search::run(
            commands::search::SearchArgs {
                query: &query,
                limit,
                kind,
                doc,
                source: source.source.as_deref(),
            },
            settings,
            format,
        ),
        Commands::List {
            kind,
            doc,
            prefix,
            source,
        } => commands::list::run_list(
            commands::list::ListFilter { kind, doc, prefix },
            source.source.as_deref(),
            settings,
            format,
        ),
        Commands::Docs { source } => {
            commands::list::run_docs(source.source.as_deref(), settings, format)
        }
        Commands::Stats { source } => {
            commands::stats::run(source.source.as_deref(), settings, format)
        }
    }
}
