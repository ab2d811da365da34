//! Load, validate and query documentation search indexes.
//!
//! A documentation generator writes `searchindex.js` next to the rendered
//! pages: a flat registry of documented symbols plus stemmed word tables.
//! This crate parses that file into a [`SearchIndex`], builds an immutable
//! [`SymbolRegistry`] from it and answers the same queries the site's search
//! box answers through [`SearchEngine`].

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod io;
pub mod logging;
pub mod registry;
pub mod search;
pub mod searchindex;
pub mod stemmer;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{IndexError, IndexResult};
pub use registry::{SymbolRecord, SymbolRegistry};
pub use search::{ParsedQuery, SearchEngine, SearchHit, SearchOptions, SearchResults};
pub use searchindex::{ObjectEntry, SearchIndex, parse_search_index};
pub use stemmer::PorterStemmer;
pub use storage::{IndexPersistence, StorageError, StorageResult, SymbolIndex};
pub use types::*;
pub use utils::calculate_hash;
