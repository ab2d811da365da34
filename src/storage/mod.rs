pub mod error;
pub mod metadata;
pub mod persistence;
pub mod tantivy;

pub use error::{StorageError, StorageResult};
pub use metadata::IndexMetadata;
pub use persistence::{IndexOrigin, IndexPersistence, LoadedIndex};
pub use self::tantivy::{SymbolHit, SymbolIndex, SymbolSchema};
