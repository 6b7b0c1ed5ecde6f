//! Append-only ledger of reversible filesystem effects.
//!
//! A [`Transaction`] records every mutation a setup pipeline performs, in
//! order, and can undo all of them in reverse on failure. Recording is
//! infallible (an in-memory `Vec` push), so a mutation is never leaked
//! silently once it has been applied.
//!
//! # Example
//!
//! ```rust,ignore
//! use worktree_setup_transaction::{Transaction, EffectKind, EffectMetadata};
//!
//! let tx = Transaction::new(|warning| eprintln!("warning: {warning}"));
//! tx.record(EffectKind::CreateDir, path, EffectMetadata::new());
//! // ... more work, something fails ...
//! let outcome = tx.rollback();
//! assert_eq!(outcome.failed_rollbacks.len(), 0);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod checkpoint;
mod effect;
mod rollback;

pub use checkpoint::{Checkpoint, CheckpointKind};
pub use effect::{Effect, EffectKind, EffectMetadata};
pub use rollback::{FailedRollback, RollbackOutcome};

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

/// Ordered ledger of effects plus named checkpoints, with best-effort
/// reverse compensation.
///
/// Single-use per orchestration call; not `Sync`. A warning sink is
/// injected at construction so the ledger never depends on a concrete
/// logger.
pub struct Transaction {
    operations: RefCell<Vec<Effect>>,
    checkpoints: RefCell<HashMap<CheckpointKind, Checkpoint>>,
    on_warning: Box<dyn Fn(&str)>,
}

impl Transaction {
    /// Create a new, empty transaction.
    ///
    /// `on_warning` is called for every non-fatal compensation message
    /// (e.g. "directory not empty") so the ledger stays decoupled from any
    /// particular logging setup.
    pub fn new(on_warning: impl Fn(&str) + 'static) -> Self {
        Self {
            operations: RefCell::new(Vec::new()),
            checkpoints: RefCell::new(HashMap::new()),
            on_warning: Box::new(on_warning),
        }
    }

    /// Append a recorded effect. Infallible by design (invariant 1).
    pub fn record(&self, kind: EffectKind, path: impl AsRef<Path>, metadata: EffectMetadata) {
        let effect = Effect {
            kind,
            path: path.as_ref().to_path_buf(),
            metadata,
            timestamp: SystemTime::now(),
        };
        log::debug!("recording effect {:?} at {}", effect.kind, effect.path.display());
        self.operations.borrow_mut().push(effect);
    }

    /// Insert or replace a named checkpoint.
    pub fn create_checkpoint(&self, checkpoint: Checkpoint) {
        let kind = checkpoint.kind();
        log::debug!("checkpoint {kind:?}");
        self.checkpoints.borrow_mut().insert(kind, checkpoint);
    }

    /// Read a checkpoint without removing it.
    #[must_use]
    pub fn get_checkpoint(&self, kind: &CheckpointKind) -> Option<Checkpoint> {
        self.checkpoints.borrow().get(kind).cloned()
    }

    /// Snapshot of the currently recorded effects, oldest first.
    #[must_use]
    pub fn get_operations(&self) -> Vec<Effect> {
        self.operations.borrow().clone()
    }

    /// Undo every recorded effect in reverse insertion order.
    ///
    /// Per-effect failures are caught and collected rather than aborting
    /// the sweep (invariant 2). The returned outcome carries the
    /// checkpoints as they stood *before* this call cleared them, because
    /// callers (the orchestrator) need the `"worktree"` checkpoint after
    /// the ledger has already been wiped.
    pub fn rollback(&self) -> RollbackOutcome {
        let checkpoints_snapshot = self.checkpoints.borrow().clone();
        let mut rolled_back_operations = 0;
        let mut failed_rollbacks = Vec::new();

        for effect in self.operations.borrow().iter().rev() {
            match rollback::compensate(effect, &checkpoints_snapshot, self.on_warning.as_ref()) {
                Ok(true) => rolled_back_operations += 1,
                Ok(false) => {}
                Err(reason) => {
                    log::warn!(
                        "failed to compensate {:?} at {}: {reason}",
                        effect.kind,
                        effect.path.display()
                    );
                    failed_rollbacks.push(FailedRollback {
                        effect: effect.clone(),
                        reason,
                    });
                }
            }
        }

        self.clear();

        RollbackOutcome {
            rolled_back_operations,
            failed_rollbacks,
            checkpoints: checkpoints_snapshot,
        }
    }

    /// Drop all ledger entries and checkpoints, making the transaction
    /// reusable (invariant 7).
    pub fn clear(&self) {
        self.operations.borrow_mut().clear();
        self.checkpoints.borrow_mut().clear();
    }
}
