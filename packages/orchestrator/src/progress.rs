//! Progress events emitted across the seven phases.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Which of the seven phases is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Merging configuration and resolving the source tree.
    Init,
    /// Capturing the mandatory `"worktree"` checkpoint.
    Checkpoint,
    /// Pre-copy linking (`link.beforeCopy == true`).
    LinkBefore,
    /// Running the bulk-copy helper. `estimating` is true while the helper
    /// is counting files rather than transferring them.
    Copy {
        /// Whether this event marks the file-count estimation sub-step.
        estimating: bool,
    },
    /// Post-copy linking (`link.beforeCopy == false`).
    LinkAfter,
    /// Verifying the destination and every created link.
    Validation,
    /// The pipeline finished successfully.
    Complete,
    /// Compensation is running after a failure.
    Rollback,
}

/// One update delivered to a [`crate::SetupOptions`] progress sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A phase boundary was crossed.
    Phase(Phase),
    /// A copy sub-progress message, already formatted per spec §4.4
    /// ("Syncing files: x/total (pct%)" or "Synced: x files").
    CopyProgress(String),
}
