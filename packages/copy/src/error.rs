//! Error types for the bulk-copy helper.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error;

/// Errors that can occur while driving the external bulk-copy program.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The bulk-copy program is not present in the environment.
    #[error("bulk-copy program {program:?} is not installed")]
    ProgramMissing {
        /// The program name that was probed.
        program: String,
    },

    /// Failed to spawn the bulk-copy program.
    #[error("failed to spawn {program:?}: {source}")]
    SpawnFailed {
        /// The program name.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bulk-copy program exited with a non-zero status.
    #[error("{program:?} exited with a failure status: {stderr}")]
    ProcessFailed {
        /// The program name.
        program: String,
        /// Captured standard error.
        stderr: String,
    },

    /// An I/O error occurred while streaming the program's output.
    #[error("I/O error reading bulk-copy output: {0}")]
    Io(#[from] std::io::Error),
}
