//! Process exit codes.

/// Exit codes returned by `docdex`.
///
/// Scripts can rely on 0 meaning "found something" and 1 meaning "ran fine,
/// found nothing"; everything above is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    NotFound = 1,
    GeneralError = 2,
    /// The search index could not be parsed or failed validation.
    InvalidIndex = 3,
    /// The persisted index could not be read or written.
    IndexError = 4,
    ConfigError = 5,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::NotFound.code(), 1);
        assert_eq!(ExitCode::GeneralError.code(), 2);
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::NotFound.is_success());
    }
}
