//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running a conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Rejected before any process was launched.
    #[error("Invalid input: {reason}")]
    Validation { reason: String },

    /// A path handed to the engine lacks an extension. The engine infers
    /// formats from extensions, so this is fatal and never retried.
    #[error("Path must have an extension: {path}")]
    MissingExtension { path: PathBuf },

    /// The external binary could not be launched at all.
    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine exited non-zero.
    #[error("Engine exited with code {code:?}: {stderr}")]
    EngineFailed { code: Option<i32>, stderr: String },

    /// The deadline fired and the process was killed.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The engine reported success but the expected output never
    /// materialized.
    #[error("Expected output artifact missing: {path}")]
    ArtifactMissing { path: PathBuf },

    /// Output directory could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates an engine-failure error with a bounded stderr excerpt.
    pub fn engine_failed(code: Option<i32>, stderr: &str) -> Self {
        Self::EngineFailed {
            code,
            stderr: excerpt(stderr, 1000),
        }
    }
}

/// Truncates diagnostics to a loggable excerpt.
pub(crate) fn excerpt(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failed_truncates_stderr() {
        let long = "x".repeat(5000);
        let err = ConverterError::engine_failed(Some(1), &long);
        match err {
            ConverterError::EngineFailed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr.chars().count(), 1000);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_excerpt_short_input_untouched() {
        assert_eq!(excerpt("short", 1000), "short");
    }
}
