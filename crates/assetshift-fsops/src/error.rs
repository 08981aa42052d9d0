//! # Design
//!
//! - Provide structured, constant-message errors for the reorganization engine.
//! - Capture operation context (paths, fields, inputs) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for reorganization operations.
pub type ReorgResult<T> = Result<T, ReorgError>;

/// Errors produced while resolving, planning, or committing a reorganization.
#[derive(Debug, Error)]
pub enum ReorgError {
    /// IO failures while interacting with the filesystem.
    #[error("reorg io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures.
    #[error("reorg walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// Globset compilation failures.
    #[error("reorg glob failure")]
    Glob {
        /// Operation that triggered the glob failure.
        operation: &'static str,
        /// Glob pattern that failed to compile.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
    /// The resolution entry point does not exist.
    #[error("reorg entry not found")]
    EntryNotFound {
        /// Root-relative path that was requested.
        path: String,
    },
    /// The destination root is empty or escapes the project root.
    #[error("reorg destination invalid")]
    DestinationInvalid {
        /// Static reason for the rejection.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// A transfer target was already occupied.
    #[error("reorg destination already exists")]
    AlreadyExists {
        /// Root-relative path that was occupied.
        path: String,
    },
    /// Input validation failures.
    #[error("reorg invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Required state was missing from the run.
    #[error("reorg missing state")]
    MissingState {
        /// State field that was missing.
        field: &'static str,
    },
}

impl ReorgError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn glob(
        operation: &'static str,
        pattern: String,
        source: globset::Error,
    ) -> Self {
        Self::Glob {
            operation,
            pattern,
            source,
        }
    }

    pub(crate) fn destination(reason: &'static str, value: &str) -> Self {
        Self::DestinationInvalid {
            reason,
            value: Some(value.to_string()),
        }
    }

    /// Whether the error aborts a run before any filesystem mutation.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::EntryNotFound { .. } | Self::DestinationInvalid { .. }
        )
    }
}
