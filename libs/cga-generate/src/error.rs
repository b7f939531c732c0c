//! # Generation Errors
//!
//! Every failure of a generation call is reported as one [`GenerationError`].
//!
//! ## Error Policy
//!
//! - A failing initial shape invalidates the whole batch before the engine runs
//! - Engine faults (error status or panic) are converted, never propagated raw
//! - A shape the engine fails to generate is absent from the result, not an error

use std::path::PathBuf;

use cga_engine::{EngineError, Status};
use thiserror::Error;

/// Category of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InsufficientOverrides,
    PackageResolution,
    EngineNotReady,
    OptionValidation,
    OutputPath,
    Generation,
}

/// Errors that can occur during a generation call.
///
/// ## Example
///
/// ```rust
/// use cga_generate::{ErrorKind, GenerationError};
///
/// let err = GenerationError::InsufficientOverrides { supplied: 2, shapes: 5 };
/// assert_eq!(err.kind(), ErrorKind::InsufficientOverrides);
/// assert!(err.to_string().contains("2 given for 5"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// An initial shape has malformed geometry or an unusable path.
    #[error("Invalid initial shape {shape_index}: {message}")]
    Validation { shape_index: usize, message: String },

    /// Fewer attribute sets than shapes, and not exactly one.
    #[error("Not enough shape attribute sets: {supplied} given for {shapes} initial shapes")]
    InsufficientOverrides { supplied: usize, shapes: usize },

    /// The rule package could not be turned into a resolve map.
    #[error("Resolving rule package '{package}' failed: {message}")]
    PackageResolution { package: String, message: String },

    /// Generation was requested before the engine was initialized.
    #[error("Rule engine has not been initialized")]
    EngineNotReady,

    /// The engine rejected an encoder or one of its options.
    #[error("Invalid options for encoder '{encoder}': {message}")]
    OptionValidation { encoder: String, message: String },

    /// The `outputPath` of a file encoder is missing or not a directory.
    #[error("Invalid output path '{}': {message}", .path.display())]
    OutputPath { path: PathBuf, message: String },

    /// The engine's generate call failed.
    #[error("Generation failed with status '{status}' ({code}): {message}")]
    Generation {
        status: Status,
        code: i32,
        message: String,
    },
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Validation { .. } => ErrorKind::Validation,
            GenerationError::InsufficientOverrides { .. } => ErrorKind::InsufficientOverrides,
            GenerationError::PackageResolution { .. } => ErrorKind::PackageResolution,
            GenerationError::EngineNotReady => ErrorKind::EngineNotReady,
            GenerationError::OptionValidation { .. } => ErrorKind::OptionValidation,
            GenerationError::OutputPath { .. } => ErrorKind::OutputPath,
            GenerationError::Generation { .. } => ErrorKind::Generation,
        }
    }

    /// Engine status behind a generation failure, when there is one.
    pub fn status(&self) -> Option<Status> {
        match self {
            GenerationError::Generation { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn validation(shape_index: usize, message: impl Into<String>) -> Self {
        GenerationError::Validation {
            shape_index,
            message: message.into(),
        }
    }
}

impl From<EngineError> for GenerationError {
    fn from(err: EngineError) -> Self {
        GenerationError::Generation {
            status: err.status,
            code: err.status.code(),
            message: err.message,
        }
    }
}

/// Result type alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_keeps_status() {
        let err: GenerationError = EngineError::new(Status::WriteError, "disk full").into();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.status(), Some(Status::WriteError));
        let text = err.to_string();
        assert!(text.contains("write error"));
        assert!(text.contains("disk full"));
        assert!(text.contains("(7)"));
    }

    #[test]
    fn test_output_path_display() {
        let err = GenerationError::OutputPath {
            path: PathBuf::from("/missing/out"),
            message: "not a directory".into(),
        };
        assert!(err.to_string().contains("/missing/out"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenerationError>();
    }
}
