//! Environment-variable configuration overlay (spec §6: `env` layer).
//!
//! Every key is recognized under a `WORKTREE_SETUP_` prefix, e.g.
//! `WORKTREE_SETUP_COPY_ENABLED=false`. List-valued keys are comma-separated;
//! boolean-valued keys accept `true`/`false`, `1`/`0`, or `yes`/`no`
//! (case-insensitively).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::env;
use std::path::PathBuf;

use crate::types::{ConfigValues, DeleteBranchMode};

const PREFIX: &str = "WORKTREE_SETUP_";

fn var(name: &str) -> Option<String> {
    env::var(format!("{PREFIX}{name}")).ok()
}

fn bool_var(name: &str) -> Option<bool> {
    var(name).and_then(|raw| match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        other => {
            log::warn!("ignoring unrecognized boolean value {other:?} for {PREFIX}{name}");
            None
        }
    })
}

fn list_var(name: &str) -> Option<Vec<String>> {
    var(name).map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn delete_branch_mode_var(name: &str) -> Option<DeleteBranchMode> {
    var(name).and_then(|raw| match raw.to_lowercase().as_str() {
        "none" => Some(DeleteBranchMode::None),
        "local" => Some(DeleteBranchMode::Local),
        "remote" => Some(DeleteBranchMode::Remote),
        other => {
            log::warn!("ignoring unrecognized value {other:?} for {PREFIX}{name}");
            None
        }
    })
}

/// Read the `WORKTREE_SETUP_*` environment variables into [`ConfigValues`].
#[must_use]
pub fn load_env_values() -> ConfigValues {
    let mut values = ConfigValues::default();

    values.copy.enabled = bool_var("COPY_ENABLED");
    values.copy.flags = list_var("COPY_FLAGS");
    values.copy.exclude = list_var("COPY_EXCLUDE");

    values.link.patterns = list_var("LINK_PATTERNS");
    values.link.relative = bool_var("LINK_RELATIVE");
    values.link.before_copy = bool_var("LINK_BEFORE_COPY");

    values.worktree.default_parent = var("WORKTREE_DEFAULT_PARENT").map(PathBuf::from);
    values.worktree.rebase_on_add = bool_var("WORKTREE_REBASE_ON_ADD");
    values.worktree.delete_branch_on_remove = delete_branch_mode_var("WORKTREE_DELETE_BRANCH_ON_REMOVE");

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn reads_recognized_vars() {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: serialized by ENV_LOCK; no other thread in this process touches these vars.
        unsafe {
            env::set_var("WORKTREE_SETUP_COPY_ENABLED", "false");
            env::set_var("WORKTREE_SETUP_LINK_PATTERNS", "package.json, vendor/");
            env::set_var("WORKTREE_SETUP_WORKTREE_REBASE_ON_ADD", "yes");
        }

        let values = load_env_values();

        assert_eq!(values.copy.enabled, Some(false));
        assert_eq!(
            values.link.patterns,
            Some(vec!["package.json".to_string(), "vendor/".to_string()])
        );
        assert_eq!(values.worktree.rebase_on_add, Some(true));

        // SAFETY: serialized by ENV_LOCK.
        unsafe {
            env::remove_var("WORKTREE_SETUP_COPY_ENABLED");
            env::remove_var("WORKTREE_SETUP_LINK_PATTERNS");
            env::remove_var("WORKTREE_SETUP_WORKTREE_REBASE_ON_ADD");
        }
    }

    #[test]
    fn unset_vars_yield_none() {
        let _guard = ENV_LOCK.lock().unwrap();
        let values = load_env_values();
        assert!(values.copy.enabled.is_none());
        assert!(values.link.patterns.is_none());
    }

    #[test]
    fn unrecognized_bool_is_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: serialized by ENV_LOCK.
        unsafe {
            env::set_var("WORKTREE_SETUP_COPY_ENABLED", "maybe");
        }
        let values = load_env_values();
        assert_eq!(values.copy.enabled, None);
        // SAFETY: serialized by ENV_LOCK.
        unsafe {
            env::remove_var("WORKTREE_SETUP_COPY_ENABLED");
        }
    }
}
