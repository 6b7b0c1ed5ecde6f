//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Set up and tear down git worktrees with a curated copy/link pipeline.
#[derive(Debug, Parser)]
#[command(name = "worktree-setup", version)]
pub struct Args {
    /// Enable verbose (debug-level) logging.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create (if needed) and materialize a worktree.
    Add(AddArgs),
    /// List every worktree of the current repository.
    List(ListArgs),
    /// Retract a worktree.
    Remove(RemoveArgs),
    /// Print the filesystem path of a worktree, for shell `cd` integration.
    Go(GoArgs),
    /// Print the fully resolved configuration and per-key provenance.
    Config(ConfigArgs),
}

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Path for the new (or already existing) worktree.
    pub path: PathBuf,

    /// Check out this existing branch instead of creating a new one.
    #[arg(long)]
    pub branch: Option<String>,

    /// Create a new branch with this name for the worktree.
    #[arg(long = "new-branch")]
    pub new_branch: Option<String>,

    /// Force creation even if the branch is checked out elsewhere.
    #[arg(long)]
    pub force: bool,

    /// Skip the bulk-copy phase entirely.
    #[arg(long = "skip-copy")]
    pub skip_copy: bool,

    /// Skip both linking phases entirely.
    #[arg(long = "skip-link")]
    pub skip_link: bool,

    /// Emit the stable JSON result schema instead of human-readable output.
    #[arg(long)]
    pub json: bool,

    /// Disable progress bars (useful for CI or when piping output).
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Never prompt; fail instead of asking how to create the worktree.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,
}

impl AddArgs {
    #[must_use]
    pub fn should_show_progress(&self) -> bool {
        !self.no_progress && !self.json
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.non_interactive && !self.json
    }
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Emit a JSON array instead of a formatted table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Path of the worktree to remove.
    pub path: PathBuf,

    /// Remove even if the worktree has local modifications.
    #[arg(long)]
    pub force: bool,

    /// Never prompt for confirmation.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,
}

#[derive(Debug, Parser)]
pub struct GoArgs {
    /// A worktree path, or a branch name checked out in one.
    pub target: String,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Emit JSON instead of a formatted table.
    #[arg(long)]
    pub json: bool,
}
