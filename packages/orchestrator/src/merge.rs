//! Configuration merge semantics (spec §4.5).
//!
//! Scalars are replaced by the override when present; `exclude`/`patterns`
//! are always concatenated, base first, so an override only ever adds
//! entries.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use worktree_setup_copy::CopyConfig;
use worktree_setup_link::LinkConfig;

/// Per-invocation override for the copy section (`SetupOptions.copy_override`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOverride {
    /// Replaces `CopyConfig::enabled` when set.
    pub enabled: Option<bool>,
    /// Replaces `CopyConfig::flags` when set (sequence has meaningful order).
    pub flags: Option<Vec<String>>,
    /// Appended to `CopyConfig::exclude` when set.
    pub exclude: Option<Vec<String>>,
}

/// Per-invocation override for the link section (`SetupOptions.link_override`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOverride {
    /// Appended to `LinkConfig::patterns` when set.
    pub patterns: Option<Vec<String>>,
    /// Replaces `LinkConfig::relative` when set.
    pub relative: Option<bool>,
    /// Replaces `LinkConfig::before_copy` when set.
    pub before_copy: Option<bool>,
}

/// Merge `base` with `override_`, per spec §4.5.
#[must_use]
pub fn merge_copy(base: &CopyConfig, override_: Option<&CopyOverride>) -> CopyConfig {
    let Some(o) = override_ else {
        return base.clone();
    };

    let mut exclude = base.exclude.clone();
    if let Some(extra) = &o.exclude {
        exclude.extend(extra.iter().cloned());
    }

    CopyConfig {
        enabled: o.enabled.unwrap_or(base.enabled),
        flags: o.flags.clone().unwrap_or_else(|| base.flags.clone()),
        exclude,
    }
}

/// Merge `base` with `override_`, per spec §4.5.
#[must_use]
pub fn merge_link(base: &LinkConfig, override_: Option<&LinkOverride>) -> LinkConfig {
    let Some(o) = override_ else {
        return base.clone();
    };

    let mut patterns = base.patterns.clone();
    if let Some(extra) = &o.patterns {
        patterns.extend(extra.iter().cloned());
    }

    LinkConfig {
        patterns,
        relative: o.relative.unwrap_or(base.relative),
        before_copy: o.before_copy.unwrap_or(base.before_copy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_merge_concatenates_exclude_and_replaces_scalars() {
        let base = CopyConfig {
            enabled: true,
            flags: vec!["-a".into()],
            exclude: vec!["node_modules".into()],
        };
        let override_ = CopyOverride {
            enabled: Some(false),
            flags: Some(vec!["-av".into()]),
            exclude: Some(vec!["target".into()]),
        };

        let merged = merge_copy(&base, Some(&override_));
        assert!(!merged.enabled);
        assert_eq!(merged.flags, vec!["-av".to_string()]);
        assert_eq!(
            merged.exclude,
            vec!["node_modules".to_string(), "target".to_string()]
        );
    }

    #[test]
    fn copy_merge_with_no_override_returns_base() {
        let base = CopyConfig {
            enabled: true,
            flags: vec!["-a".into()],
            exclude: vec!["node_modules".into()],
        };
        assert_eq!(merge_copy(&base, None), base);
    }

    #[test]
    fn link_merge_concatenates_patterns() {
        let base = LinkConfig {
            patterns: vec!["package.json".into()],
            relative: false,
            before_copy: true,
        };
        let override_ = LinkOverride {
            patterns: Some(vec!["pnpm-lock.yaml".into()]),
            relative: None,
            before_copy: None,
        };

        let merged = merge_link(&base, Some(&override_));
        assert_eq!(
            merged.patterns,
            vec!["package.json".to_string(), "pnpm-lock.yaml".to_string()]
        );
        assert!(!merged.relative);
        assert!(merged.before_copy);
    }

    #[test]
    fn link_merge_scalars_replace_when_present() {
        let base = LinkConfig {
            patterns: vec![],
            relative: false,
            before_copy: true,
        };
        let override_ = LinkOverride {
            patterns: None,
            relative: Some(true),
            before_copy: Some(false),
        };

        let merged = merge_link(&base, Some(&override_));
        assert!(merged.relative);
        assert!(!merged.before_copy);
    }
}
