//! Detecting pre-existing paths that would collide with a planned link.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

/// What already occupies a link's target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// A regular file is already there.
    File,
    /// A directory is already there.
    Directory,
    /// A symbolic link is already there.
    SymbolicLink,
}

/// A planned link whose target already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The planned link's source.
    pub source: PathBuf,
    /// The planned link's target.
    pub target: PathBuf,
    /// What occupies the target.
    pub reason: ConflictReason,
}

/// A planned `source -> target` link before conflict detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLink {
    /// Absolute path to the link's source.
    pub source: PathBuf,
    /// Absolute path where the link will be created.
    pub target: PathBuf,
}

/// Classify every target in `links` that already exists.
#[must_use]
pub fn detect_conflicts(links: &[PlannedLink]) -> Vec<Conflict> {
    links
        .iter()
        .filter_map(|link| classify(&link.target).map(|reason| Conflict {
            source: link.source.clone(),
            target: link.target.clone(),
            reason,
        }))
        .collect()
}

fn classify(target: &Path) -> Option<ConflictReason> {
    let metadata = std::fs::symlink_metadata(target).ok()?;
    if metadata.file_type().is_symlink() {
        Some(ConflictReason::SymbolicLink)
    } else if metadata.is_dir() {
        Some(ConflictReason::Directory)
    } else {
        Some(ConflictReason::File)
    }
}
