//! Terminal presentation: colors and tables for text output.

pub mod tables;
pub mod theme;

pub use tables::{create_table, documents_table, kind_counts_table, symbols_table};
pub use theme::Theme;
