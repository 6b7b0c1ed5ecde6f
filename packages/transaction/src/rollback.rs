//! Compensation: reverse-order undo of recorded effects.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashMap;
use std::fs;

use crate::checkpoint::{Checkpoint, CheckpointKind};
use crate::effect::{Effect, EffectKind};

/// One effect that could not be compensated cleanly (an unexpected I/O
/// error during the compensating action itself, not an expected no-op).
#[derive(Debug, Clone)]
pub struct FailedRollback {
    /// The effect that failed to compensate.
    pub effect: Effect,
    /// Why compensation failed.
    pub reason: String,
}

/// Outcome of a full ledger rollback.
///
/// Carries the pre-rollback checkpoint snapshot: by the time the caller
/// could otherwise ask the (now-cleared) transaction for the `"worktree"`
/// checkpoint, rollback has already dropped it. See Design Note in the
/// orchestrator crate for why this field exists.
#[derive(Debug, Clone, Default)]
pub struct RollbackOutcome {
    /// Number of effects that were actually undone (not no-ops).
    pub rolled_back_operations: usize,
    /// Effects whose compensating action raised an unexpected error.
    pub failed_rollbacks: Vec<FailedRollback>,
    /// Checkpoints as they stood immediately before the ledger was cleared.
    pub checkpoints: HashMap<CheckpointKind, Checkpoint>,
}

/// Compensate a single effect, invoking `on_warning` for expected no-ops
/// and returning `Err` only for an unexpected I/O failure.
pub(crate) fn compensate(
    effect: &Effect,
    checkpoints: &HashMap<CheckpointKind, Checkpoint>,
    on_warning: &dyn Fn(&str),
) -> Result<bool, String> {
    match effect.kind {
        EffectKind::CreateLink => compensate_create_link(effect, on_warning),
        EffectKind::BulkCopy => compensate_bulk_copy(effect, on_warning),
        EffectKind::CreateDir => compensate_create_dir(effect, on_warning),
        EffectKind::DeleteFile => compensate_delete_file(effect, checkpoints, on_warning),
    }
}

fn compensate_create_link(effect: &Effect, on_warning: &dyn Fn(&str)) -> Result<bool, String> {
    let meta = fs::symlink_metadata(&effect.path);
    match meta {
        Err(_) => Ok(false), // absent: no-op
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(&effect.path).map_err(|e| e.to_string())?;
            Ok(true)
        }
        Ok(_) => {
            on_warning("path exists but is not a symbolic link");
            Ok(false)
        }
    }
}

fn compensate_bulk_copy(effect: &Effect, on_warning: &dyn Fn(&str)) -> Result<bool, String> {
    let Some(destination) = effect.metadata.get("destination") else {
        on_warning("no destination metadata recorded");
        return Ok(false);
    };

    if !destination.exists() {
        return Ok(false);
    }

    if destination.is_dir() {
        fs::remove_dir_all(destination).map_err(|e| e.to_string())?;
    } else {
        fs::remove_file(destination).map_err(|e| e.to_string())?;
    }
    Ok(true)
}

fn compensate_create_dir(effect: &Effect, on_warning: &dyn Fn(&str)) -> Result<bool, String> {
    if !effect.path.exists() {
        return Ok(false);
    }

    let mut entries = fs::read_dir(&effect.path).map_err(|e| e.to_string())?;
    if entries.next().is_some() {
        on_warning("directory not empty");
        return Ok(false);
    }

    fs::remove_dir(&effect.path).map_err(|e| e.to_string())?;
    Ok(true)
}

fn compensate_delete_file(
    effect: &Effect,
    checkpoints: &HashMap<CheckpointKind, Checkpoint>,
    on_warning: &dyn Fn(&str),
) -> Result<bool, String> {
    let key = CheckpointKind::File(effect.path.clone());
    match checkpoints.get(&key) {
        Some(Checkpoint::FileBackup { contents, .. }) => {
            fs::write(&effect.path, contents).map_err(|e| e.to_string())?;
            Ok(true)
        }
        _ => {
            on_warning("no checkpoint backup available");
            Ok(false)
        }
    }
}
