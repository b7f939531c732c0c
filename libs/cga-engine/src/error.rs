//! # Engine Errors
//!
//! Status codes and the error type returned across the engine boundary.

use std::fmt;
use thiserror::Error;

/// Outcome codes reported by the rule engine.
///
/// ## Example
///
/// ```rust
/// use cga_engine::Status;
///
/// assert_eq!(Status::Ok.code(), 0);
/// assert_eq!(Status::FileNotFound.description(), "file not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The call succeeded.
    Ok,
    /// Failure without a more specific code.
    UnspecifiedError,
    /// A referenced file does not exist or cannot be read.
    FileNotFound,
    /// An argument violates the call's contract.
    InvalidArgument,
    /// A rule package or asset could not be resolved.
    ResolveError,
    /// No encoder is registered under the requested identifier.
    UnknownEncoder,
    /// An encoder option is unknown or has the wrong kind.
    InvalidOption,
    /// Writing generated output failed.
    WriteError,
}

impl Status {
    /// Numeric code of this status.
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::UnspecifiedError => 1,
            Status::FileNotFound => 2,
            Status::InvalidArgument => 3,
            Status::ResolveError => 4,
            Status::UnknownEncoder => 5,
            Status::InvalidOption => 6,
            Status::WriteError => 7,
        }
    }

    /// Human-readable description of this status.
    pub fn description(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::UnspecifiedError => "unspecified error",
            Status::FileNotFound => "file not found",
            Status::InvalidArgument => "invalid argument",
            Status::ResolveError => "resolve error",
            Status::UnknownEncoder => "unknown encoder",
            Status::InvalidOption => "invalid encoder option",
            Status::WriteError => "write error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error returned by every fallible engine capability.
///
/// ## Example
///
/// ```rust
/// use cga_engine::{EngineError, Status};
///
/// let err = EngineError::new(Status::ResolveError, "missing rule file");
/// assert_eq!(err.status, Status::ResolveError);
/// assert!(err.to_string().contains("missing rule file"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{status}: {message}")]
pub struct EngineError {
    /// Status code of the failure.
    pub status: Status,
    /// Context for debugging.
    pub message: String,
}

impl EngineError {
    /// Creates an error with the given status and message.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = [
            Status::Ok,
            Status::UnspecifiedError,
            Status::FileNotFound,
            Status::InvalidArgument,
            Status::ResolveError,
            Status::UnknownEncoder,
            Status::InvalidOption,
            Status::WriteError,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::new(Status::InvalidOption, "unknown option 'foo'");
        let text = err.to_string();
        assert!(text.contains("invalid encoder option"));
        assert!(text.contains("foo"));
    }

    /// Errors cross thread boundaries when callbacks run on worker threads.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
