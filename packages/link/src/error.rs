//! Error types for link materialization.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

use crate::Conflict;

/// Errors that can occur while creating links.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Pattern expansion against the source tree failed.
    #[error(transparent)]
    Glob(#[from] worktree_setup_glob::GlobError),

    /// One or more targets already exist and `skip_conflicts` was false.
    #[error("{} link target(s) already exist", .0.len())]
    LinkConflict(Vec<Conflict>),

    /// A target existed and could not be removed before linking.
    #[error("failed to remove existing path {path}: {source}")]
    RemoveExisting {
        /// The path that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The platform symlink call failed.
    #[error("failed to link {target} -> {source_path}: {error}")]
    SymlinkFailed {
        /// The link's resolved source.
        source_path: PathBuf,
        /// The link's target path.
        target: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// An I/O error occurred while inspecting a path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
