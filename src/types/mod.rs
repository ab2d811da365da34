use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Index into the per-document tables (`docnames`, `filenames`, `titles`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

/// Object type code as written by the generator (`"0"`, `"1"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjTypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(NonZeroU32);

/// Search priority attached to every documented object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Important,
    Default,
    Unimportant,
    Hidden,
    Other(i64),
}

/// Decoded `objnames` entry, e.g. `py` / `class` / `Python class`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKind {
    pub domain: String,
    pub role: String,
    pub label: String,
}

impl DocId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_index(&self) -> usize {
        self.0 as usize
    }
}

impl ObjTypeId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SymbolId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Priority {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Priority::Important,
            1 => Priority::Default,
            2 => Priority::Unimportant,
            -1 => Priority::Hidden,
            other => Priority::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Priority::Important => 0,
            Priority::Default => 1,
            Priority::Unimportant => 2,
            Priority::Hidden => -1,
            Priority::Other(code) => *code,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Priority::Hidden)
    }
}

impl ObjectKind {
    pub fn new(
        domain: impl Into<String>,
        role: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            role: role.into(),
            label: label.into(),
        }
    }

    /// `domain:role`, the form used by the `objtypes` table.
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.domain, self.role)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_id_creation() {
        assert!(SymbolId::new(0).is_none());

        let id = SymbolId::new(42).unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_priority_codes() {
        assert_eq!(Priority::from_code(0), Priority::Important);
        assert_eq!(Priority::from_code(1), Priority::Default);
        assert_eq!(Priority::from_code(2), Priority::Unimportant);
        assert_eq!(Priority::from_code(-1), Priority::Hidden);
        assert_eq!(Priority::from_code(7), Priority::Other(7));

        for code in [-1, 0, 1, 2, 9] {
            assert_eq!(Priority::from_code(code).code(), code);
        }
        assert!(Priority::Hidden.is_hidden());
        assert!(!Priority::Default.is_hidden());
    }

    #[test]
    fn test_object_kind_qualified() {
        let kind = ObjectKind::new("py", "class", "Python class");
        assert_eq!(kind.qualified(), "py:class");
        assert_eq!(kind.to_string(), "Python class");
    }

    #[test]
    fn test_doc_id_index() {
        let doc = DocId::new(3);
        assert_eq!(doc.as_index(), 3);
        assert_eq!(doc.value(), 3);
    }
}
