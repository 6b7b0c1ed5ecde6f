//! Layering partial [`ConfigValues`] onto the built-in defaults, tracking
//! per-leaf-key provenance (spec §6).
//!
//! Layers are applied lowest precedence first so each subsequent layer
//! overwrites only the keys it actually sets: built-in defaults, then the
//! global config, then the project-manifest embedded section, then the
//! dedicated repo config, then environment variables, then CLI overrides.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::types::{ConfigSource, ConfigValues, Provenance, ResolvedConfig};

/// Apply one layer's values onto `resolved`, recording provenance only for
/// the keys this layer actually set.
pub fn apply_layer(
    resolved: &mut ResolvedConfig,
    provenance: &mut Provenance,
    source: ConfigSource,
    values: &ConfigValues,
) {
    if let Some(enabled) = values.copy.enabled {
        resolved.copy.enabled = enabled;
        provenance.insert("copy.enabled".to_string(), source);
    }
    if let Some(flags) = &values.copy.flags {
        resolved.copy.flags.clone_from(flags);
        provenance.insert("copy.flags".to_string(), source);
    }
    if let Some(exclude) = &values.copy.exclude {
        resolved.copy.exclude.clone_from(exclude);
        provenance.insert("copy.exclude".to_string(), source);
    }

    if let Some(patterns) = &values.link.patterns {
        resolved.link.patterns.clone_from(patterns);
        provenance.insert("link.patterns".to_string(), source);
    }
    if let Some(relative) = values.link.relative {
        resolved.link.relative = relative;
        provenance.insert("link.relative".to_string(), source);
    }
    if let Some(before_copy) = values.link.before_copy {
        resolved.link.before_copy = before_copy;
        provenance.insert("link.beforeCopy".to_string(), source);
    }

    if let Some(default_parent) = &values.worktree.default_parent {
        resolved.worktree.default_parent = Some(default_parent.clone());
        provenance.insert("worktree.defaultParent".to_string(), source);
    }
    if let Some(rebase_on_add) = values.worktree.rebase_on_add {
        resolved.worktree.rebase_on_add = rebase_on_add;
        provenance.insert("worktree.rebaseOnAdd".to_string(), source);
    }
    if let Some(delete_branch_on_remove) = values.worktree.delete_branch_on_remove {
        resolved.worktree.delete_branch_on_remove = delete_branch_on_remove;
        provenance.insert("worktree.deleteBranchOnRemove".to_string(), source);
    }
}

/// Merge a full precedence stack onto the built-in defaults.
///
/// `layers` must be given lowest precedence first; a later entry overwrites
/// any key an earlier entry also set.
#[must_use]
pub fn merge_layers(builtin: ResolvedConfig, layers: &[(ConfigSource, ConfigValues)]) -> (ResolvedConfig, Provenance) {
    let mut resolved = builtin;
    let mut provenance = Provenance::new();
    for (source, values) in layers {
        apply_layer(&mut resolved, &mut provenance, *source, values);
    }
    (resolved, provenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtin_defaults;

    #[test]
    fn later_layer_overrides_earlier_scalar() {
        let mut global = ConfigValues::default();
        global.copy.enabled = Some(false);
        let mut cli = ConfigValues::default();
        cli.copy.enabled = Some(true);

        let (resolved, provenance) = merge_layers(
            builtin_defaults(),
            &[(ConfigSource::GlobalConfig, global), (ConfigSource::Cli, cli)],
        );

        assert!(resolved.copy.enabled);
        assert_eq!(provenance.get("copy.enabled"), Some(&ConfigSource::Cli));
    }

    #[test]
    fn unset_keys_fall_through_to_builtin() {
        let (resolved, provenance) = merge_layers(builtin_defaults(), &[]);
        assert!(resolved.copy.enabled);
        assert!(provenance.is_empty());
    }

    #[test]
    fn array_valued_key_is_replaced_wholesale_not_concatenated() {
        let mut repo = ConfigValues::default();
        repo.copy.exclude = Some(vec!["node_modules".to_string()]);
        let mut env = ConfigValues::default();
        env.copy.exclude = Some(vec![".env".to_string()]);

        let (resolved, _) = merge_layers(
            builtin_defaults(),
            &[(ConfigSource::RepoConfig, repo), (ConfigSource::Env, env)],
        );

        assert_eq!(resolved.copy.exclude, vec![".env".to_string()]);
    }
}
