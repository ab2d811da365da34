//! Loading and validating documentation search indexes.

mod model;
mod parser;

pub use model::{DocumentRef, ObjectEntry, SearchIndex};
pub use parser::parse_search_index;
