//! Resolved configuration and the partial layer values merged into it.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use worktree_setup_copy::CopyConfig;
use worktree_setup_link::LinkConfig;

/// What should happen to a worktree's branch when the worktree is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteBranchMode {
    /// Leave the branch alone.
    #[default]
    None,
    /// Delete the local branch.
    Local,
    /// Delete the local branch and its upstream remote branch.
    Remote,
}

/// The non-orchestration settings governing how worktrees are added/removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeConfig {
    /// Directory new worktrees are created under when none is given
    /// explicitly.
    pub default_parent: Option<PathBuf>,
    /// Attempt a rebase onto the current default branch after creation.
    pub rebase_on_add: bool,
    /// What to do with the branch when a worktree is removed.
    pub delete_branch_on_remove: DeleteBranchMode,
}

/// The fully resolved, directly usable configuration (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Bulk-copy section, consumed directly by the orchestrator.
    pub copy: CopyConfig,
    /// Link section, consumed directly by the orchestrator.
    pub link: LinkConfig,
    /// Worktree lifecycle settings, consumed by the CLI surface.
    pub worktree: WorktreeConfig,
}

/// Which layer a leaf key's value was ultimately taken from, highest
/// precedence first (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// A per-invocation CLI flag.
    Cli,
    /// An environment variable.
    Env,
    /// The dedicated repo-root config file.
    RepoConfig,
    /// A section embedded in a project manifest.
    ProjectManifest,
    /// The user's global config file.
    GlobalConfig,
    /// The built-in default, present when no layer set this key.
    BuiltinDefault,
}

/// Per-leaf-key provenance, keyed by dotted path (e.g. `"copy.exclude"`).
pub type Provenance = HashMap<String, ConfigSource>;

/// Optional mirror of [`CopyConfig`] used while merging layers: `None`
/// means "this layer did not set this key".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyValues {
    /// See [`CopyConfig::enabled`].
    pub enabled: Option<bool>,
    /// See [`CopyConfig::flags`].
    pub flags: Option<Vec<String>>,
    /// See [`CopyConfig::exclude`].
    pub exclude: Option<Vec<String>>,
}

/// Optional mirror of [`LinkConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkValues {
    /// See [`LinkConfig::patterns`].
    pub patterns: Option<Vec<String>>,
    /// See [`LinkConfig::relative`].
    pub relative: Option<bool>,
    /// See [`LinkConfig::before_copy`].
    pub before_copy: Option<bool>,
}

/// Optional mirror of [`WorktreeConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorktreeValues {
    /// See [`WorktreeConfig::default_parent`].
    pub default_parent: Option<PathBuf>,
    /// See [`WorktreeConfig::rebase_on_add`].
    pub rebase_on_add: Option<bool>,
    /// See [`WorktreeConfig::delete_branch_on_remove`].
    pub delete_branch_on_remove: Option<DeleteBranchMode>,
}

/// One layer's worth of configuration values, any of which may be absent.
///
/// Every source (dedicated file, embedded manifest section, env vars, CLI
/// overrides) is loaded into this shape before being merged onto the
/// built-in defaults (spec §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigValues {
    /// Bulk-copy overrides.
    pub copy: CopyValues,
    /// Link overrides.
    pub link: LinkValues,
    /// Worktree lifecycle overrides.
    pub worktree: WorktreeValues,
}

/// The settings a crate ships with when no configuration source sets them.
#[must_use]
pub fn builtin_defaults() -> ResolvedConfig {
    ResolvedConfig {
        copy: CopyConfig {
            enabled: true,
            flags: vec!["-a".to_string()],
            exclude: Vec::new(),
        },
        link: LinkConfig {
            patterns: Vec::new(),
            relative: false,
            before_copy: true,
        },
        worktree: WorktreeConfig {
            default_parent: None,
            rebase_on_add: false,
            delete_branch_on_remove: DeleteBranchMode::None,
        },
    }
}
