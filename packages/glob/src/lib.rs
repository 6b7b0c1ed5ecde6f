//! Glob pattern expansion against a source tree.
//!
//! The one invariant callers rely on: if the expanded set contains both a
//! directory `D` and any path strictly inside `D`, only `D` is kept. This
//! stops a pattern list like `["vendor", "vendor/*"]` from producing a
//! directory link and a file link to the same contents.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;

pub use error::GlobError;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};

/// Expand all `patterns` against `base_dir`, returning matched paths
/// relative to `base_dir`.
///
/// Matches may be files or directories. See module docs for the
/// covering-directory dedup invariant applied to the result.
///
/// # Errors
///
/// * If any pattern fails to compile.
/// * If `base_dir` cannot be walked.
pub fn match_patterns(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, GlobError> {
    if patterns.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|source| GlobError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?);
    }
    let set = builder
        .build()
        .map_err(|source| GlobError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;

    let mut matches = Vec::new();
    for entry in jwalk::WalkDir::new(base_dir).skip_hidden(false).sort(false) {
        let entry = entry.map_err(|e| GlobError::WalkError {
            path: base_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let path = entry.path();
        if path == base_dir {
            continue;
        }

        let Ok(rel) = path.strip_prefix(base_dir) else {
            continue;
        };

        if set.is_match(rel) {
            matches.push(rel.to_path_buf());
        }
    }

    log::debug!(
        "{} pattern(s) matched {} path(s) before dedup",
        patterns.len(),
        matches.len()
    );

    Ok(dedup_covering_directories(matches))
}

/// Drop any match that is strictly inside another, shorter match.
fn dedup_covering_directories(mut matches: Vec<PathBuf>) -> Vec<PathBuf> {
    matches.sort_by_key(|p| p.components().count());

    let mut kept: Vec<PathBuf> = Vec::new();
    'candidates: for candidate in matches.drain(..) {
        for existing in &kept {
            if &candidate != existing && candidate.starts_with(existing) {
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }

    kept.sort();
    kept
}
