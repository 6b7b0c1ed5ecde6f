//! Creating and verifying individual links.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use worktree_setup_transaction::{EffectKind, EffectMetadata, Transaction};

use crate::error::LinkError;

/// Options controlling how a single link is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateLinkOptions {
    /// Store the link's target relative to its parent directory rather than
    /// as an absolute path.
    pub relative: bool,
    /// Remove an existing target before linking, instead of failing.
    pub replace_existing: bool,
}

/// Create a single symbolic link at `target` pointing at `source`.
///
/// Records a `CreateLink` effect on `transaction` carrying the resolved
/// source as `metadata.target`, matching what [`crate::verify_link`] checks
/// and what the rollback path compensates.
///
/// # Errors
///
/// Returns [`LinkError::LinkConflict`] if `target` exists and
/// `replace_existing` is false, [`LinkError::RemoveExisting`] if an existing
/// target can't be removed, and [`LinkError::SymlinkFailed`] if the platform
/// symlink call fails.
pub fn create_link(
    source: &Path,
    target: &Path,
    options: CreateLinkOptions,
    transaction: &Transaction,
) -> Result<(), LinkError> {
    if target.exists() || target.is_symlink() {
        if !options.replace_existing {
            return Err(LinkError::LinkConflict(vec![crate::conflict::Conflict {
                source: source.to_path_buf(),
                target: target.to_path_buf(),
                reason: crate::conflict::ConflictReason::File,
            }]));
        }
        remove_existing(target)?;
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let resolved_source = resolve_source(source, target, options.relative);
    link(&resolved_source, target)?;

    transaction.record(
        EffectKind::CreateLink,
        target,
        EffectMetadata::new().with("target", source.to_path_buf()),
    );

    Ok(())
}

fn remove_existing(target: &Path) -> Result<(), LinkError> {
    let metadata = std::fs::symlink_metadata(target).map_err(|source| LinkError::RemoveExisting {
        path: target.to_path_buf(),
        source,
    })?;

    let result = if metadata.is_dir() && !metadata.file_type().is_symlink() {
        std::fs::remove_dir_all(target)
    } else {
        std::fs::remove_file(target)
    };

    result.map_err(|source| LinkError::RemoveExisting {
        path: target.to_path_buf(),
        source,
    })
}

fn resolve_source(source: &Path, target: &Path, relative: bool) -> PathBuf {
    if !relative {
        return source.to_path_buf();
    }

    let Some(target_parent) = target.parent() else {
        return source.to_path_buf();
    };

    pathdiff(source, target_parent).unwrap_or_else(|| source.to_path_buf())
}

/// Compute `path` relative to `base`, walking up shared ancestors.
fn pathdiff(path: &Path, base: &Path) -> Option<PathBuf> {
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let common_len = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common_len..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common_len..] {
        result.push(component);
    }

    Some(result)
}

#[cfg(unix)]
fn link(source: &Path, target: &Path) -> Result<(), LinkError> {
    std::os::unix::fs::symlink(source, target).map_err(|error| LinkError::SymlinkFailed {
        source_path: source.to_path_buf(),
        target: target.to_path_buf(),
        error,
    })
}

#[cfg(windows)]
fn link(source: &Path, target: &Path) -> Result<(), LinkError> {
    let make = if source.is_dir() {
        std::os::windows::fs::symlink_dir
    } else {
        std::os::windows::fs::symlink_file
    };
    make(source, target).map_err(|error| LinkError::SymlinkFailed {
        source_path: source.to_path_buf(),
        target: target.to_path_buf(),
        error,
    })
}

/// Check whether `link_path` is a symlink resolving to `expected_target`.
#[must_use]
pub fn verify_link(link_path: &Path, expected_target: &Path) -> bool {
    std::fs::read_link(link_path)
        .ok()
        .is_some_and(|resolved| {
            if resolved.is_absolute() {
                resolved == expected_target
            } else {
                link_path
                    .parent()
                    .map(|parent| parent.join(&resolved))
                    .and_then(|joined| std::fs::canonicalize(joined).ok())
                    .zip(std::fs::canonicalize(expected_target).ok())
                    .is_some_and(|(a, b)| a == b)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn creates_absolute_link_and_records_effect() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let target = dir.path().join("target.txt");

        let tx = Transaction::new(|_| {});
        create_link(&source, &target, CreateLinkOptions::default(), &tx).unwrap();

        assert!(target.is_symlink());
        assert_eq!(tx.get_operations().len(), 1);
        assert_eq!(tx.get_operations()[0].kind, EffectKind::CreateLink);
    }

    #[test]
    fn fails_on_conflict_without_replace() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, "existing").unwrap();

        let tx = Transaction::new(|_| {});
        let result = create_link(&source, &target, CreateLinkOptions::default(), &tx);
        assert!(matches!(result, Err(LinkError::LinkConflict(_))));
    }

    #[test]
    fn replaces_existing_when_requested() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, "existing").unwrap();

        let tx = Transaction::new(|_| {});
        let options = CreateLinkOptions {
            relative: false,
            replace_existing: true,
        };
        create_link(&source, &target, options, &tx).unwrap();
        assert!(target.is_symlink());
    }

    #[test]
    fn relative_link_resolves_to_same_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let target = dir.path().join("nested/target.txt");

        let tx = Transaction::new(|_| {});
        let options = CreateLinkOptions {
            relative: true,
            replace_existing: false,
        };
        create_link(&source, &target, options, &tx).unwrap();

        assert!(verify_link(&target, &source));
    }

    #[test]
    fn verify_link_detects_wrong_target() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let wrong = dir.path().join("wrong.txt");
        fs::write(&wrong, "y").unwrap();
        let target = dir.path().join("target.txt");

        let tx = Transaction::new(|_| {});
        create_link(&source, &target, CreateLinkOptions::default(), &tx).unwrap();

        assert!(!verify_link(&target, &wrong));
    }
}
