//! JSON output envelope shared by every `docdex` command.
//!
//! Every `--json` response has the same outer shape so scripts can branch on
//! `status` or `code` before looking at `data`:
//!
//! ```json
//! {"type": "result", "status": "success", "code": "OK", "exit_code": 0,
//!  "message": "...", "data": [...], "meta": {"schema_version": "1.0.0"}}
//! ```

use serde::{Deserialize, Serialize};

use super::ExitCode;
use crate::error::IndexError;
use crate::storage::StorageError;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Top-level `type` field: answers and failures can be told apart in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeType {
    Result,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    /// The command ran but matched nothing.
    NotFound,
    Error,
}

/// Machine-readable outcome, serialized as `OK`, `PARSE_ERROR`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    NotFound,
    /// `searchindex.js` is not a readable index object.
    ParseError,
    /// The index parsed but its tables contradict each other.
    ValidationError,
    /// The persisted index could not be read or written.
    IndexError,
    ConfigError,
    InternalError,
}

impl ResultCode {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Ok => ExitCode::Success,
            Self::NotFound => ExitCode::NotFound,
            Self::ParseError | Self::ValidationError => ExitCode::InvalidIndex,
            Self::IndexError => ExitCode::IndexError,
            Self::ConfigError => ExitCode::ConfigError,
            Self::InternalError => ExitCode::GeneralError,
        }
    }
}

impl From<&IndexError> for ResultCode {
    fn from(err: &IndexError) -> Self {
        match err {
            IndexError::FileRead { .. } => Self::IndexError,
            IndexError::Parse(_) => Self::ParseError,
            IndexError::IdOverflow => Self::InternalError,
            _ => Self::ValidationError,
        }
    }
}

impl From<&StorageError> for ResultCode {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::Index(inner) => inner.into(),
            _ => Self::IndexError,
        }
    }
}

/// What `data` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Symbol,
    SearchResult,
    Document,
    Stats,
    IndexSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    #[serde(rename = "type")]
    pub envelope_type: EnvelopeType,
    pub status: Status,
    pub code: ResultCode,
    /// Same value the process exits with.
    pub exit_code: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// `null` unless the command succeeded.
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Things the user can try to recover.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// Facts about the payload. Unset fields are left out of the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// Items in `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Matches before a limit was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            entity_type: None,
            count: None,
            query: None,
            total: None,
            truncated: None,
        }
    }
}

impl<T> Envelope<T> {
    fn new(status: Status, code: ResultCode, message: String, data: Option<T>) -> Self {
        let envelope_type = match status {
            Status::Error => EnvelopeType::Error,
            Status::Success | Status::NotFound => EnvelopeType::Result,
        };
        Self {
            envelope_type,
            status,
            code,
            exit_code: code.exit_code().code(),
            message,
            hint: None,
            data,
            error: None,
            meta: Meta::default(),
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(Status::Success, ResultCode::Ok, "OK".to_string(), Some(data))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, ResultCode::NotFound, message.into(), None)
    }

    pub fn error(code: ResultCode, message: impl Into<String>) -> Self {
        Self::new(Status::Error, code, message.into(), None)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        Self {
            hint: Some(hint.into()),
            ..self
        }
    }

    pub fn with_error_details(self, details: ErrorDetails) -> Self {
        Self {
            error: Some(details),
            ..self
        }
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.meta.entity_type = Some(entity_type);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.meta.count = Some(count);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.meta.query = Some(query.into());
        self
    }

    /// Record the untruncated total; `shown < total` marks the payload truncated.
    pub fn with_total(mut self, total: usize, shown: usize) -> Self {
        self.meta.total = Some(total);
        self.meta.truncated = Some(shown < total);
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        T: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}
