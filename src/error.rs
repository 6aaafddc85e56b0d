//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the textmatch application.
///
/// - 0: Success
/// - 1: Usage error (invalid configuration values)
/// - 2: Failure (unreadable input, too few documents, output or move errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The run completed.
    Success = 0,
    /// Configuration was rejected before any work was done.
    UsageError = 1,
    /// The run could not complete, or some duplicates could not be moved.
    Failure = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TM000",
            Self::UsageError => "TM001",
            Self::Failure => "TM002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TM002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}

/// Exit code for an error returned by the application.
///
/// Configuration errors are usage errors; everything else is a failure.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<crate::config::ConfigError>().is_some() {
        ExitCode::UsageError
    } else {
        ExitCode::Failure
    }
}
