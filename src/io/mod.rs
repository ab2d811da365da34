//! What commands print: the JSON envelope, the text/JSON switch and exit codes.

pub mod envelope;
pub mod exit_code;
pub mod format;

pub use envelope::{
    EntityType, Envelope, EnvelopeType, ErrorDetails, Meta, ResultCode, SCHEMA_VERSION, Status,
};
pub use exit_code::ExitCode;
pub use format::OutputFormat;
