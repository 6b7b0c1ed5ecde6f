//! Error taxonomy for the setup orchestrator (spec §7).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error;

use crate::vcs::CapabilityError;
use crate::SetupResult;

/// The specific failure that triggered compensation, carried inside
/// [`SetupError::cause`].
#[derive(Debug, Error)]
pub enum Cause {
    /// A user precondition was not met (source/destination missing, etc).
    #[error("{0}")]
    Validation(String),

    /// The bulk-copy program is absent from the environment.
    #[error("bulk-copy program is not installed")]
    CopyProgramMissing,

    /// Pattern expansion against the source tree failed.
    #[error(transparent)]
    Glob(#[from] worktree_setup_glob::GlobError),

    /// The link helper failed (conflict, I/O, or symlink failure).
    #[error(transparent)]
    Link(#[from] worktree_setup_link::LinkError),

    /// The bulk-copy helper failed.
    #[error(transparent)]
    Copy(#[from] worktree_setup_copy::CopyError),

    /// The version-control capability failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// An unexpected filesystem error occurred directly in the orchestrator
    /// (e.g. clearing a destination path before linking).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The single error type the orchestrator ever returns. Always carries the
/// [`SetupResult`] as it stood at the point of failure, with `compensated`
/// reflecting whether undo succeeded (spec §7).
#[derive(Debug, Error)]
#[error("worktree setup failed: {message}")]
pub struct SetupError {
    /// Human-readable summary, derived from `cause`.
    pub message: String,
    /// Partial result captured before compensation ran.
    pub result: Box<SetupResult>,
    /// What triggered the failure.
    #[source]
    pub cause: Cause,
}
