//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Create custom help text with consistent styling
fn create_custom_help() -> String {
    use crate::display::Theme;

    let mut help = String::new();

    help.push_str(&format!("{}\n", Theme::header("Quick Start:")));
    help.push_str("  $ docdex init                                   # Create .docdex/settings.toml\n");
    help.push_str("  $ docdex index docs/_build/html/searchindex.js  # Build the persisted index\n");
    help.push_str("  $ docdex search \"cellular automaton\"            # Objects and pages\n");
    help.push_str("  $ docdex lookup todo_list.model.ToDoItem        # Exact symbol lookup\n");
    help.push_str("  $ docdex fuzzy TodoLsit                         # Typo-tolerant lookup\n\n");

    help.push_str("Load, validate and query documentation search indexes.\n\n");

    help.push_str(&Theme::header("Usage:"));
    help.push_str(" docdex [OPTIONS] <COMMAND>\n\n");

    help.push_str(&format!("{}\n", Theme::header("Commands:")));
    help.push_str("  init      Set up .docdex directory\n");
    help.push_str("  index     Build the persisted index from searchindex.js\n");
    help.push_str("  lookup    Find a symbol by its full dotted name\n");
    help.push_str("  search    Search objects and page text\n");
    help.push_str("  fuzzy     Typo-tolerant symbol lookup\n");
    help.push_str("  list      List indexed symbols\n");
    help.push_str("  docs      List documents with symbol counts\n");
    help.push_str("  stats     Show index statistics\n");
    help.push_str("  config    Display active settings\n");
    help.push_str("  help      Print this message or the help of the given subcommand(s)\n\n");

    help.push_str("See 'docdex help <command>' for more information on a specific command.\n\n");

    help.push_str(&format!("{}\n", Theme::header("Options:")));
    help.push_str("  -c, --config <CONFIG>  Path to custom settings.toml file\n");
    help.push_str("      --json             Print a JSON envelope instead of text\n");
    help.push_str("  -h, --help             Print help\n");
    help.push_str("  -V, --version          Print version\n");

    help
}

/// Documentation search index tool
#[derive(Parser)]
#[command(
    name = "docdex",
    version = env!("CARGO_PKG_VERSION"),
    about = "Query documentation search indexes",
    long_about = "Load, validate and query documentation search indexes (searchindex.js).",
    next_line_help = true,
    styles = clap_cargo_style(),
    override_help = create_custom_help()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print a JSON envelope instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which `searchindex.js` a query command reads.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// searchindex.js to query (defaults to index.source, then the last indexed file)
    #[arg(long, value_name = "FILE")]
    pub source: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration file
    #[command(about = "Set up .docdex directory with a default settings.toml")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Build or rebuild the persisted index
    #[command(
        about = "Build the persisted index from searchindex.js",
        long_about = "Parse and validate a searchindex.js file and persist it.\n\
                      The whole index is rebuilt whenever the file changed; use --force to rebuild anyway."
    )]
    Index {
        /// Path to searchindex.js (defaults to index.source)
        source: Option<PathBuf>,

        /// Rebuild even if the index is up to date
        #[arg(short, long)]
        force: bool,
    },

    /// Exact lookup by full dotted name
    #[command(
        about = "Find a symbol by its full dotted name",
        long_about = "Find a symbol by its full dotted name.\n\
                      Falls back to every symbol whose last name segment matches."
    )]
    Lookup {
        /// Full name, e.g. todo_list.model.ToDoItem
        name: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Combined object and full-text search
    #[command(
        about = "Search objects and page text",
        long_about = "Search objects and page text the way the site's search box does.\n\
                      Prefix a word with '-' to exclude pages containing it."
    )]
    Search {
        /// Query text
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only objects of this kind (class, method, py:function, ...)
        #[arg(short, long)]
        kind: Option<String>,

        /// Only results in this document
        #[arg(short, long)]
        doc: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Typo-tolerant symbol lookup
    #[command(about = "Typo-tolerant symbol lookup")]
    Fuzzy {
        /// Symbol name, possibly misspelled
        name: String,

        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Enumerate registry entries
    #[command(about = "List indexed symbols")]
    List {
        /// Only symbols of this kind (class, method, py:function, ...)
        #[arg(short, long)]
        kind: Option<String>,

        /// Only symbols documented in this document
        #[arg(short, long)]
        doc: Option<String>,

        /// Only symbols defined under this dotted name
        #[arg(short, long)]
        prefix: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List documents
    #[command(about = "List documents with symbol counts")]
    Docs {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Index statistics
    #[command(about = "Show counts by kind, documents, terms and build metadata")]
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,
}
