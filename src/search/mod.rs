//! Search over a loaded index: object names, stemmed terms and fuzzy lookup.

pub mod engine;
pub mod query;
pub mod scorer;

pub use engine::{FuzzyMatch, HitKind, SearchEngine, SearchHit, SearchOptions, SearchResults};
pub use query::{DEFAULT_STOPWORDS, ParsedQuery, QueryConfig};
pub use scorer::ScorerWeights;
