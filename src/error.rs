//! Error types for the resolution engine
//!
//! Public engine operations never surface these to callers: they are logged
//! and collapsed into "not found" at the component boundary. Internal helpers
//! use them so that failures can be propagated with `?` up to that boundary.

use std::path::PathBuf;

/// Failures that can occur while locating definitions or references
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Reading or inspecting a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated search pattern did not compile
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A file enumeration glob did not compile
    #[error("Invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Empty or otherwise unusable search input
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A spawned scan task panicked or was cancelled
    #[error("Scan task failed: {reason}")]
    Task { reason: String },
}

impl ResolverError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ResolverError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task {
            reason: err.to_string(),
        }
    }
}
