//! Error types for glob pattern resolution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while expanding glob patterns.
#[derive(Debug, Error)]
pub enum GlobError {
    /// A pattern failed to compile.
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// Failed to walk the base directory.
    #[error("Failed to walk directory {}: {message}", path.display())]
    WalkError {
        /// The directory that was being walked.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}
