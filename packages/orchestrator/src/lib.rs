//! Seven-phase worktree setup pipeline with all-or-nothing compensation.
//!
//! [`SetupOrchestrator`] sequences the [`worktree_setup_copy`] and
//! [`worktree_setup_link`] helpers against a [`worktree_setup_transaction::Transaction`],
//! driven by a [`VcsCapability`]. Any failure in phases 1–6 triggers reverse
//! compensation, including asking the capability to retract the worktree it
//! created.
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_orchestrator::{SetupOrchestrator, SetupOptions, GitRepoVcs};
//! use worktree_setup_copy::CopyConfig;
//! use worktree_setup_link::LinkConfig;
//!
//! let vcs = GitRepoVcs::discover(&destination)?;
//! let orchestrator = SetupOrchestrator::new(vcs, copy_cfg, link_cfg);
//! let result = orchestrator.setup_new_worktree(&destination, SetupOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod merge;
mod progress;
mod vcs;

pub use error::{Cause, SetupError};
pub use merge::{merge_copy, merge_link, CopyOverride, LinkOverride};
pub use progress::{Phase, ProgressEvent};
pub use vcs::{CapabilityError, GitRepoVcs, VcsCapability};

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use worktree_setup_copy::{CopyConfig, CopyOptions, CopyProgressEvent, CopyStats};
use worktree_setup_link::{LinkConfig, LinkStats};
use worktree_setup_transaction::{Checkpoint, CheckpointKind, EffectKind, Transaction};

/// Per-invocation options (spec §3 "Setup options").
pub struct SetupOptions<'a> {
    /// Override merged into the configured `copy` section (§4.5).
    pub copy_override: Option<CopyOverride>,
    /// Override merged into the configured `link` section (§4.5).
    pub link_override: Option<LinkOverride>,
    /// Skip the copy phase entirely.
    pub skip_copy: bool,
    /// Skip both linking phases entirely.
    pub skip_link: bool,
    /// Receives a [`ProgressEvent`] at every phase boundary and copy tick.
    pub on_progress: Option<Box<dyn FnMut(ProgressEvent) + 'a>>,
}

impl Default for SetupOptions<'_> {
    fn default() -> Self {
        Self {
            copy_override: None,
            link_override: None,
            skip_copy: false,
            skip_link: false,
            on_progress: None,
        }
    }
}

/// Outcome of [`SetupOrchestrator::setup_new_worktree`], whether it
/// succeeded or failed (in which case it's carried inside [`SetupError`]).
#[derive(Debug, Clone, Default)]
pub struct SetupResult {
    /// Whether the pipeline completed phase 7 without failing.
    pub success: bool,
    /// Statistics from the copy phase, if it ran.
    pub copy_stats: Option<CopyStats>,
    /// Statistics from whichever linking phase ran.
    pub link_stats: Option<LinkStats>,
    /// Wall-clock duration of the whole call.
    pub duration_ms: u64,
    /// Non-fatal messages accumulated along the way.
    pub warnings: Vec<String>,
    /// Whether compensation ran and fully succeeded (always `false` on
    /// success, since compensation never runs).
    pub compensated: bool,
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn emit(options: &mut SetupOptions<'_>, event: ProgressEvent) {
    if let Some(sink) = options.on_progress.as_mut() {
        sink(event);
    }
}

/// Drives the seven-phase pipeline against a source tree reached through
/// `V`. Single-use per call to [`Self::setup_new_worktree`]; concurrent
/// calls on the same instance are undefined (spec §5).
pub struct SetupOrchestrator<V: VcsCapability> {
    vcs: V,
    copy_config: CopyConfig,
    link_config: LinkConfig,
    copy_program: String,
}

impl<V: VcsCapability> SetupOrchestrator<V> {
    /// Build an orchestrator over the resolved `copy`/`link` configuration
    /// sections. Defaults the bulk-copy program to `"rsync"`.
    #[must_use]
    pub fn new(vcs: V, copy_config: CopyConfig, link_config: LinkConfig) -> Self {
        Self {
            vcs,
            copy_config,
            link_config,
            copy_program: "rsync".to_string(),
        }
    }

    /// Override the bulk-copy program name (builder style).
    #[must_use]
    pub fn with_copy_program(mut self, program: impl Into<String>) -> Self {
        self.copy_program = program.into();
        self
    }

    /// Run the pipeline against an already-created worktree at `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if any phase 1–6 fails. Compensation has
    /// always already run by the time this returns; `err.result.compensated`
    /// reports whether it fully succeeded.
    pub fn setup_new_worktree(
        &self,
        destination: &Path,
        mut options: SetupOptions<'_>,
    ) -> Result<SetupResult, SetupError> {
        let start = Instant::now();
        let warnings: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let copy_stats_cell: RefCell<Option<CopyStats>> = RefCell::new(None);
        let link_stats_cell: RefCell<Option<LinkStats>> = RefCell::new(None);

        let transaction = {
            let warnings = Rc::clone(&warnings);
            Transaction::new(move |w: &str| warnings.borrow_mut().push(w.to_string()))
        };

        let outcome = self.run(
            destination,
            &mut options,
            &transaction,
            &warnings,
            &copy_stats_cell,
            &link_stats_cell,
            start,
        );

        match outcome {
            Ok(result) => Ok(result),
            Err(cause) => Err(self.compensate(
                &mut options,
                &transaction,
                &warnings,
                &copy_stats_cell,
                &link_stats_cell,
                start,
                cause,
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        destination: &Path,
        options: &mut SetupOptions<'_>,
        transaction: &Transaction,
        warnings: &Rc<RefCell<Vec<String>>>,
        copy_stats_cell: &RefCell<Option<CopyStats>>,
        link_stats_cell: &RefCell<Option<LinkStats>>,
        start: Instant,
    ) -> Result<SetupResult, Cause> {
        emit(options, ProgressEvent::Phase(Phase::Init));

        let merged_copy = merge_copy(&self.copy_config, options.copy_override.as_ref());
        let merged_link = merge_link(&self.link_config, options.link_override.as_ref());

        let source = self.vcs.get_main_worktree_path()?;
        if !source.exists() {
            return Err(Cause::Validation(format!(
                "source tree {} does not exist",
                source.display()
            )));
        }
        if !destination.exists() {
            return Err(Cause::Validation(format!(
                "destination {} does not exist",
                destination.display()
            )));
        }

        emit(options, ProgressEvent::Phase(Phase::Checkpoint));
        transaction.create_checkpoint(Checkpoint::Worktree {
            path: destination.to_path_buf(),
        });

        if !options.skip_link && merged_link.before_copy {
            emit(options, ProgressEvent::Phase(Phase::LinkBefore));
            let stats = self.phase_link(&source, destination, &merged_link, transaction, warnings)?;
            link_stats_cell.replace(Some(stats));
        }

        if !options.skip_copy && merged_copy.enabled {
            let stats = self.phase_copy(
                &source,
                destination,
                &merged_copy,
                &merged_link,
                options,
                transaction,
                warnings,
            )?;
            copy_stats_cell.replace(Some(stats));
        }

        if !options.skip_link && !merged_link.before_copy {
            emit(options, ProgressEvent::Phase(Phase::LinkAfter));
            let stats = self.phase_link(&source, destination, &merged_link, transaction, warnings)?;
            link_stats_cell.replace(Some(stats));
        }

        emit(options, ProgressEvent::Phase(Phase::Validation));
        if !destination.exists() {
            warnings.borrow_mut().push(format!(
                "destination {} no longer exists at validation time",
                destination.display()
            ));
        }
        for effect in transaction.get_operations() {
            if effect.kind != EffectKind::CreateLink {
                continue;
            }
            if let Some(expected_target) = effect.metadata.get("target") {
                if !worktree_setup_link::verify_link(&effect.path, expected_target) {
                    warnings
                        .borrow_mut()
                        .push(format!("link verification failed for {}", effect.path.display()));
                }
            }
        }
        if let Some(stats) = copy_stats_cell.borrow().as_ref() {
            if !stats.success {
                warnings
                    .borrow_mut()
                    .push("bulk-copy program reported an unsuccessful completion".to_string());
            }
        }

        emit(options, ProgressEvent::Phase(Phase::Complete));

        Ok(SetupResult {
            success: true,
            copy_stats: copy_stats_cell.borrow().clone(),
            link_stats: link_stats_cell.borrow().clone(),
            duration_ms: elapsed_ms(start),
            warnings: warnings.borrow().clone(),
            compensated: false,
        })
    }

    /// Remove anything already at a link target in the destination before
    /// linking, the same precondition phases 3 and 5 both rely on (spec
    /// §4.4): the version-control tool may have checked out tracked files
    /// matching the link patterns.
    fn clear_destination_matches(
        &self,
        source: &Path,
        destination: &Path,
        patterns: &[String],
    ) -> Result<(), Cause> {
        let matches = worktree_setup_glob::match_patterns(source, patterns)?;
        for relpath in matches {
            let dest_path = destination.join(&relpath);
            let Ok(meta) = fs::symlink_metadata(&dest_path) else {
                continue;
            };
            if meta.is_dir() && !meta.file_type().is_symlink() {
                fs::remove_dir_all(&dest_path)?;
            } else {
                fs::remove_file(&dest_path)?;
            }
        }
        Ok(())
    }

    fn phase_link(
        &self,
        source: &Path,
        destination: &Path,
        merged_link: &LinkConfig,
        transaction: &Transaction,
        warnings: &Rc<RefCell<Vec<String>>>,
    ) -> Result<LinkStats, Cause> {
        self.clear_destination_matches(source, destination, &merged_link.patterns)?;
        let stats =
            worktree_setup_link::create_links(source, destination, merged_link, true, true, transaction)?;
        for conflict in &stats.conflicts {
            warnings.borrow_mut().push(format!(
                "link conflict at {} ({:?}) despite pre-clearing the destination; skipped",
                conflict.target.display(),
                conflict.reason
            ));
        }
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn phase_copy(
        &self,
        source: &Path,
        destination: &Path,
        merged_copy: &CopyConfig,
        merged_link: &LinkConfig,
        options: &mut SetupOptions<'_>,
        transaction: &Transaction,
        warnings: &Rc<RefCell<Vec<String>>>,
    ) -> Result<CopyStats, Cause> {
        emit(options, ProgressEvent::Phase(Phase::Copy { estimating: true }));

        if !worktree_setup_copy::probe_installed(&self.copy_program) {
            return Err(Cause::CopyProgramMissing);
        }

        // Always excluded regardless of before/after ordering (spec §4.4
        // Phase 4): a path that will be linked must never be overwritten by
        // the bulk copy.
        let link_matches = worktree_setup_glob::match_patterns(source, &merged_link.patterns)?;
        let mut additional_excludes = Vec::with_capacity(link_matches.len());
        for relpath in &link_matches {
            let abs = source.join(relpath);
            match fs::symlink_metadata(&abs) {
                Ok(meta) if meta.is_dir() => additional_excludes.push(format!("/{}/", relpath.display())),
                Ok(_) => additional_excludes.push(format!("/{}", relpath.display())),
                Err(_) => {
                    warnings.borrow_mut().push(format!(
                        "could not stat link match {} while building copy excludes; treating as a file",
                        abs.display()
                    ));
                    additional_excludes.push(format!("/{}", relpath.display()));
                }
            }
        }

        let total_files = worktree_setup_copy::estimate_file_count(
            &self.copy_program,
            source,
            destination,
            merged_copy,
            &additional_excludes,
        )
        .ok();

        emit(options, ProgressEvent::Phase(Phase::Copy { estimating: false }));

        let copy_options = CopyOptions {
            exclude_patterns: additional_excludes,
            total_files,
            on_progress: options.on_progress.as_mut().map(|sink| {
                let boxed: Box<dyn FnMut(CopyProgressEvent)> = Box::new(move |event: CopyProgressEvent| {
                    let message = if let Some(pct) = event.percentage {
                        format!(
                            "Syncing files: {}/{} ({pct:.1}%)",
                            event.files_transferred,
                            event.total_files.unwrap_or_default()
                        )
                    } else {
                        format!("Synced: {} files", event.files_transferred)
                    };
                    sink(ProgressEvent::CopyProgress(message));
                });
                boxed
            }),
        };

        let stats = worktree_setup_copy::run_copy(
            &self.copy_program,
            source,
            destination,
            merged_copy,
            copy_options,
            transaction,
        )?;
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn compensate(
        &self,
        options: &mut SetupOptions<'_>,
        transaction: &Transaction,
        warnings: &Rc<RefCell<Vec<String>>>,
        copy_stats_cell: &RefCell<Option<CopyStats>>,
        link_stats_cell: &RefCell<Option<LinkStats>>,
        start: Instant,
        cause: Cause,
    ) -> SetupError {
        emit(options, ProgressEvent::Phase(Phase::Rollback));
        let rollback_outcome = transaction.rollback();

        for failed in &rollback_outcome.failed_rollbacks {
            warnings.borrow_mut().push(format!(
                "failed to compensate {:?} at {}: {}",
                failed.effect.kind,
                failed.effect.path.display(),
                failed.reason
            ));
        }

        let mut compensated = true;
        if let Some(Checkpoint::Worktree { path }) =
            rollback_outcome.checkpoints.get(&CheckpointKind::Worktree)
        {
            if let Err(vcs_err) = self.vcs.remove_worktree(path, true) {
                log::warn!(
                    "version-control removal of {} failed: {vcs_err}",
                    path.display()
                );
                if let Err(io_err) = fs::remove_dir_all(path) {
                    warnings.borrow_mut().push(format!(
                        "compensation partially failed: could not remove worktree directory {}: {io_err}",
                        path.display()
                    ));
                    compensated = false;
                } else {
                    warnings.borrow_mut().push(format!(
                        "version-control worktree removal failed ({vcs_err}); removed the directory directly, repository metadata cleanup may be needed"
                    ));
                }
            }
        }

        let partial = SetupResult {
            success: false,
            copy_stats: copy_stats_cell.borrow().clone(),
            link_stats: link_stats_cell.borrow().clone(),
            duration_ms: elapsed_ms(start),
            warnings: warnings.borrow().clone(),
            compensated,
        };

        SetupError {
            message: cause.to_string(),
            result: Box::new(partial),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::fake::FakeVcs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn copy_program_missing_triggers_compensation() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();

        let vcs = FakeVcs::new(source.path());
        let copy_cfg = CopyConfig {
            enabled: true,
            flags: vec![],
            exclude: vec![],
        };
        let link_cfg = LinkConfig::default();

        let orchestrator =
            SetupOrchestrator::new(vcs, copy_cfg, link_cfg).with_copy_program("no-such-copy-program-xyz");

        let err = orchestrator
            .setup_new_worktree(destination.path(), SetupOptions::default())
            .unwrap_err();

        assert!(matches!(err.cause, Cause::CopyProgramMissing));
        assert!(err.result.compensated);
        let removed = orchestrator.vcs.removed.borrow();
        assert_eq!(*removed, vec![(destination.path().to_path_buf(), true)]);
    }

    #[test]
    fn rollback_after_copy_failure_unlinks_pre_copy_links() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        fs::write(source.path().join("package.json"), "{}").unwrap();
        fs::write(source.path().join("pnpm-lock.yaml"), "").unwrap();

        let vcs = FakeVcs::new(source.path());
        let copy_cfg = CopyConfig {
            enabled: true,
            flags: vec![],
            exclude: vec![],
        };
        let link_cfg = LinkConfig {
            patterns: vec!["package.json".into(), "pnpm-lock.yaml".into()],
            relative: false,
            before_copy: true,
        };

        let orchestrator =
            SetupOrchestrator::new(vcs, copy_cfg, link_cfg).with_copy_program("no-such-copy-program-xyz");

        let err = orchestrator
            .setup_new_worktree(destination.path(), SetupOptions::default())
            .unwrap_err();

        assert_eq!(err.result.link_stats.as_ref().unwrap().created, 2);
        assert!(err.result.compensated);
        assert!(!destination.path().join("package.json").exists());
        assert!(!destination.path().join("pnpm-lock.yaml").exists());
        assert_eq!(orchestrator.vcs.removed.borrow().len(), 1);
    }

    #[test]
    fn skip_copy_and_skip_link_yields_no_stats() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();

        let vcs = FakeVcs::new(source.path());
        let copy_cfg = CopyConfig {
            enabled: true,
            flags: vec![],
            exclude: vec![],
        };
        let link_cfg = LinkConfig {
            patterns: vec!["package.json".into()],
            relative: false,
            before_copy: true,
        };

        let orchestrator = SetupOrchestrator::new(vcs, copy_cfg, link_cfg);
        let options = SetupOptions {
            skip_copy: true,
            skip_link: true,
            ..SetupOptions::default()
        };

        let result = orchestrator
            .setup_new_worktree(destination.path(), options)
            .unwrap();

        assert!(result.success);
        assert!(result.copy_stats.is_none());
        assert!(result.link_stats.is_none());
        assert!(!result.compensated);
    }

    #[test]
    fn missing_source_tree_fails_validation() {
        let source = TempDir::new().unwrap();
        let missing_source = source.path().join("does-not-exist");
        let destination = TempDir::new().unwrap();

        let vcs = FakeVcs::new(missing_source);
        let orchestrator =
            SetupOrchestrator::new(vcs, CopyConfig::default(), LinkConfig::default());

        let err = orchestrator
            .setup_new_worktree(destination.path(), SetupOptions::default())
            .unwrap_err();

        assert!(matches!(err.cause, Cause::Validation(_)));
    }
}
