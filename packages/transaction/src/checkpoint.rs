//! Named checkpoints, captured before risky work and retained across rollback.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Identifies a checkpoint. A typed enum stands in for the source
/// implementation's dynamic `"file:<path>"` string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CheckpointKind {
    /// The sole mandatory checkpoint: the worktree path, captured before
    /// any mutation so compensation can retract it.
    Worktree,
    /// Backup of a file's contents before it was deleted.
    File(PathBuf),
}

/// The payload captured at a checkpoint.
#[derive(Debug, Clone)]
pub enum Checkpoint {
    /// `{path: destinationPath}` captured in Phase 2.
    Worktree {
        /// Path of the worktree that was created.
        path: PathBuf,
    },
    /// Original contents of a file, captured before a `DeleteFile` effect.
    FileBackup {
        /// Path the contents belong to.
        path: PathBuf,
        /// The file's contents at checkpoint time.
        contents: Vec<u8>,
    },
}

impl Checkpoint {
    /// The kind this checkpoint would be stored under.
    #[must_use]
    pub fn kind(&self) -> CheckpointKind {
        match self {
            Self::Worktree { .. } => CheckpointKind::Worktree,
            Self::FileBackup { path, .. } => CheckpointKind::File(path.clone()),
        }
    }
}
