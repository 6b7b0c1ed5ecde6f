//! Materializing filesystem links from configured glob patterns.
//!
//! Pattern expansion is delegated to `worktree_setup_glob`; this crate
//! layers conflict detection, link creation, and batch orchestration on
//! top, and records every created link on a transaction so setup failures
//! can be rolled back.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod conflict;
mod create;
mod error;

pub use conflict::{detect_conflicts, Conflict, ConflictReason, PlannedLink};
pub use create::{create_link, verify_link, CreateLinkOptions};
pub use error::LinkError;

use std::path::Path;

use worktree_setup_transaction::Transaction;

/// Configured link behavior (merged from repo/project/global config and
/// per-invocation overrides).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkConfig {
    /// Glob patterns matched against the source tree.
    pub patterns: Vec<String>,
    /// Store link targets relative to their parent directory.
    pub relative: bool,
    /// Link before the copy phase runs, instead of after.
    pub before_copy: bool,
}

/// Outcome of a [`create_links`] batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Number of links successfully created.
    pub created: usize,
    /// Number of matched paths skipped due to conflicts (only when
    /// `skip_conflicts` was set).
    pub skipped: usize,
    /// Conflicts encountered, whether or not they were skipped.
    pub conflicts: Vec<Conflict>,
}

/// Orchestrate a batch of links: expand patterns, detect conflicts, then
/// create every non-conflicting link.
///
/// # Errors
///
/// Returns [`LinkError::LinkConflict`] if any target conflicts and
/// `skip_conflicts` is false. Propagates [`LinkError::Glob`] from pattern
/// expansion and per-link creation errors otherwise.
pub fn create_links(
    source_dir: &Path,
    target_dir: &Path,
    link_cfg: &LinkConfig,
    replace_existing: bool,
    skip_conflicts: bool,
    transaction: &Transaction,
) -> Result<LinkStats, LinkError> {
    let matches = worktree_setup_glob::match_patterns(source_dir, &link_cfg.patterns)?;

    let planned: Vec<PlannedLink> = matches
        .iter()
        .map(|relative| PlannedLink {
            source: source_dir.join(relative),
            target: target_dir.join(relative),
        })
        .collect();

    let conflicts = detect_conflicts(&planned);

    if !conflicts.is_empty() && !skip_conflicts {
        return Err(LinkError::LinkConflict(conflicts));
    }

    let conflicted_targets: std::collections::HashSet<_> =
        conflicts.iter().map(|c| c.target.clone()).collect();

    let mut stats = LinkStats {
        conflicts: conflicts.clone(),
        ..LinkStats::default()
    };
    let options = CreateLinkOptions {
        relative: link_cfg.relative,
        replace_existing,
    };

    for plan in &planned {
        if conflicted_targets.contains(&plan.target) && !replace_existing {
            stats.skipped += 1;
            log::warn!("skipping conflicting link target {}", plan.target.display());
            continue;
        }

        create_link(&plan.source, &plan.target, options, transaction)?;
        stats.created += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn creates_links_for_all_matches() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::write(source.path().join("pnpm-lock.yaml"), "").unwrap();

        let cfg = LinkConfig {
            patterns: vec!["package.json".into(), "pnpm-lock.yaml".into()],
            relative: false,
            before_copy: true,
        };
        let tx = Transaction::new(|_| {});
        let stats = create_links(source.path(), target.path(), &cfg, true, true, &tx).unwrap();

        assert_eq!(stats.created, 2);
        assert!(target.path().join("package.json").is_symlink());
        assert!(target.path().join("pnpm-lock.yaml").is_symlink());
    }

    #[test]
    fn conflicts_fail_when_not_skipped() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::write(target.path().join("package.json"), "already here").unwrap();

        let cfg = LinkConfig {
            patterns: vec!["package.json".into()],
            relative: false,
            before_copy: true,
        };
        let tx = Transaction::new(|_| {});
        let result = create_links(source.path(), target.path(), &cfg, false, false, &tx);

        assert!(matches!(result, Err(LinkError::LinkConflict(_))));
    }

    #[test]
    fn conflicts_are_replaced_when_replace_existing_and_skip_conflicts() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::write(target.path().join("package.json"), "already here").unwrap();

        let cfg = LinkConfig {
            patterns: vec!["package.json".into()],
            relative: false,
            before_copy: true,
        };
        let tx = Transaction::new(|_| {});
        let stats = create_links(source.path(), target.path(), &cfg, true, true, &tx).unwrap();

        assert_eq!(stats.created, 1);
        assert!(target.path().join("package.json").is_symlink());
    }
}
