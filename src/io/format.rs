//! Output format selection.

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Text,
    /// One JSON envelope on stdout
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}
