//! Building the bulk-copy program's argument list.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use crate::CopyConfig;

/// Name of the version-control metadata directory, always excluded from a
/// copy regardless of user configuration.
pub const VCS_METADATA_DIR: &str = ".git";

/// Flags the helper manages itself and strips from user-supplied `flags`.
/// Each entry is matched as an exact token or a `--flag=` prefix.
const DENYLIST: &[&str] = &[
    "--stats",
    "--progress",
    "--info=progress2",
    "--info=progress1",
    "--dry-run",
    "-n",
    "--itemize-changes",
];

fn is_denied(flag: &str) -> bool {
    DENYLIST
        .iter()
        .any(|denied| flag == *denied || flag.starts_with(&format!("{denied}=")))
}

fn normalize_source(source: &Path) -> String {
    let mut s = source.to_string_lossy().into_owned();
    if !s.ends_with(std::path::MAIN_SEPARATOR) {
        s.push(std::path::MAIN_SEPARATOR);
    }
    s
}

/// Build invocation arguments for copying `source` into `destination`.
///
/// `additional_excludes` are appended on top of `copy_cfg.exclude`; both are
/// deduplicated against each other and against the always-included
/// version-control metadata exclusion.
#[must_use]
pub fn build_args(
    source: &Path,
    destination: &Path,
    copy_cfg: &CopyConfig,
    additional_excludes: &[String],
) -> Vec<String> {
    let mut args: Vec<String> = copy_cfg
        .flags
        .iter()
        .map(String::as_str)
        .filter(|flag| !flag.trim().is_empty())
        .filter(|flag| !is_denied(flag))
        .map(str::to_owned)
        .collect();

    let mut seen_excludes = std::collections::HashSet::new();
    seen_excludes.insert(VCS_METADATA_DIR.to_string());
    args.push("--exclude".to_string());
    args.push(VCS_METADATA_DIR.to_string());

    for pattern in copy_cfg.exclude.iter().chain(additional_excludes) {
        if seen_excludes.insert(pattern.clone()) {
            args.push("--exclude".to_string());
            args.push(pattern.clone());
        }
    }

    args.push(normalize_source(source));
    args.push(destination.to_string_lossy().into_owned());

    args
}
