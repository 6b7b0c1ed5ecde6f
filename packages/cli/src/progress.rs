//! Progress rendering for the seven-phase setup pipeline.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use worktree_setup_orchestrator::{Phase, ProgressEvent};

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Init => "Resolving configuration",
        Phase::Checkpoint => "Recording checkpoint",
        Phase::LinkBefore => "Linking (pre-copy)",
        Phase::Copy { estimating: true } => "Estimating file count",
        Phase::Copy { estimating: false } => "Copying files",
        Phase::LinkAfter => "Linking (post-copy)",
        Phase::Validation => "Validating",
        Phase::Complete => "Complete",
        Phase::Rollback => "Rolling back",
    }
}

/// Wraps a single spinner that tracks which phase the orchestrator is in
/// and the latest copy-progress line, or does nothing when disabled.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        if !enabled || !Term::stdout().is_term() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("invalid spinner template"),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Consume a [`ProgressEvent`] from the orchestrator.
    pub fn handle(&self, event: ProgressEvent) {
        let Some(bar) = &self.bar else { return };
        match event {
            ProgressEvent::Phase(Phase::Complete) => bar.finish_and_clear(),
            ProgressEvent::Phase(phase) => bar.set_message(phase_label(phase)),
            ProgressEvent::CopyProgress(message) => bar.set_message(message),
        }
    }

    /// Build a closure suitable for `SetupOptions::on_progress`.
    #[must_use]
    pub fn sink(&self) -> impl FnMut(ProgressEvent) + '_ {
        move |event| self.handle(event)
    }

    /// Clear the spinner if it is still active (e.g. after a failure).
    pub fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
