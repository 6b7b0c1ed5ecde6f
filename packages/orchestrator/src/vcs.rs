//! The version-control capability the orchestrator depends on.
//!
//! The orchestrator only ever needs two operations out of everything
//! `worktree_setup_git` exposes: finding the main worktree and retracting one
//! it created. Keeping that surface as a trait lets tests exercise the full
//! seven-phase pipeline against an in-memory fake instead of a real
//! repository.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by the version-control capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The underlying git operation failed.
    #[error(transparent)]
    Git(#[from] worktree_setup_git::GitError),
}

/// The minimal version-control surface the orchestrator consumes (spec §6).
pub trait VcsCapability {
    /// Return the primary working tree path.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the path cannot be determined.
    fn get_main_worktree_path(&self) -> Result<PathBuf, CapabilityError>;

    /// Retract a worktree.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the worktree cannot be removed.
    fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), CapabilityError>;
}

/// [`VcsCapability`] backed by a real `git2::Repository` (shelling out to the
/// `git` binary for worktree mutation, the same way `worktree_setup_git`
/// itself does).
pub struct GitRepoVcs {
    repo: git2::Repository,
}

impl GitRepoVcs {
    /// Discover the repository containing `path` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if no repository can be discovered.
    pub fn discover(path: &Path) -> Result<Self, CapabilityError> {
        Ok(Self {
            repo: worktree_setup_git::discover_repo(path)?,
        })
    }

    /// Wrap an already-open repository.
    #[must_use]
    pub fn new(repo: git2::Repository) -> Self {
        Self { repo }
    }
}

impl VcsCapability for GitRepoVcs {
    fn get_main_worktree_path(&self) -> Result<PathBuf, CapabilityError> {
        Ok(worktree_setup_git::get_main_worktree(&self.repo)?.path)
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), CapabilityError> {
        worktree_setup_git::remove_worktree(&self.repo, path, force)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{CapabilityError, PathBuf, VcsCapability};
    use std::cell::RefCell;
    use std::path::Path;

    /// In-memory fake used by the orchestrator's own tests (and available to
    /// downstream crates' tests under `cfg(test)` if ever needed).
    #[derive(Default)]
    pub struct FakeVcs {
        pub main_worktree: PathBuf,
        pub removed: RefCell<Vec<(PathBuf, bool)>>,
        pub fail_remove: bool,
    }

    impl FakeVcs {
        pub fn new(main_worktree: impl Into<PathBuf>) -> Self {
            Self {
                main_worktree: main_worktree.into(),
                removed: RefCell::new(Vec::new()),
                fail_remove: false,
            }
        }
    }

    impl VcsCapability for FakeVcs {
        fn get_main_worktree_path(&self) -> Result<PathBuf, CapabilityError> {
            Ok(self.main_worktree.clone())
        }

        fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), CapabilityError> {
            self.removed
                .borrow_mut()
                .push((path.to_path_buf(), force));
            if self.fail_remove {
                return Err(CapabilityError::Git(worktree_setup_git::GitError::InvalidPath(
                    path.to_path_buf(),
                )));
            }
            Ok(())
        }
    }
}
