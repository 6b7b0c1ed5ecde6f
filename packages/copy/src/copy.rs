//! Driving the external bulk-copy program.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use worktree_setup_transaction::{EffectKind, EffectMetadata, Transaction};

use crate::args::build_args;
use crate::parse::{parse_progress_line, parse_stats};
use crate::progress::CopyProgressEvent;
use crate::version::{probe_installed, probe_version, VersionInfo};
use crate::{CopyConfig, CopyError, CopyStats};

/// Splice the flags the helper manages itself in front of the trailing
/// `[source, destination]` pair `build_args` always produces, gated on what
/// `versionInfo()` reported the program supports.
fn with_managed_flags(mut args: Vec<String>, version: VersionInfo) -> Vec<String> {
    let insert_at = args.len().saturating_sub(2);
    let mut managed = Vec::new();
    if version.supports_progress {
        managed.push("--progress".to_string());
    }
    if version.supports_stats {
        managed.push("--stats".to_string());
    }
    args.splice(insert_at..insert_at, managed);
    args
}

/// Options controlling a single [`copy`] invocation.
#[derive(Default)]
pub struct CopyOptions<'a> {
    /// Extra exclude patterns beyond `copy_cfg.exclude`.
    pub exclude_patterns: Vec<String>,
    /// File count estimate, used to compute a percentage in progress events.
    pub total_files: Option<u64>,
    /// Called once per detected whole-file-completion line.
    pub on_progress: Option<Box<dyn FnMut(CopyProgressEvent) + 'a>>,
}

/// Spawn `program`, copy `source` into `destination`, and report statistics.
///
/// Records a `BulkCopy` effect on the transaction once the child has
/// started, so a later failure still knows to compensate the destination.
///
/// # Errors
///
/// Returns [`CopyError::ProgramMissing`] if `program` cannot be probed,
/// [`CopyError::SpawnFailed`] if the child cannot be started, and
/// [`CopyError::ProcessFailed`] if it exits non-zero.
pub fn copy(
    program: &str,
    source: &Path,
    destination: &Path,
    copy_cfg: &CopyConfig,
    mut options: CopyOptions<'_>,
    transaction: &Transaction,
) -> Result<CopyStats, CopyError> {
    if !probe_installed(program) {
        return Err(CopyError::ProgramMissing {
            program: program.to_string(),
        });
    }

    let version = probe_version(program);
    let args = with_managed_flags(
        build_args(source, destination, copy_cfg, &options.exclude_patterns),
        version,
    );

    let start = Instant::now();
    let mut child = Command::new(program)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CopyError::SpawnFailed {
            program: program.to_string(),
            source,
        })?;

    transaction.record(
        EffectKind::BulkCopy,
        source,
        EffectMetadata::new().with("destination", destination),
    );

    let stdout = child.stdout.take().expect("stdout was piped");
    let reader = BufReader::new(stdout);

    let mut files_transferred = 0u64;
    let mut collected_output = String::new();

    for line in reader.lines() {
        let line = line?;
        collected_output.push_str(&line);
        collected_output.push('\n');

        let class = parse_progress_line(&line);
        if class.is_file_complete {
            files_transferred += 1;
            if let Some(callback) = options.on_progress.as_mut() {
                callback(CopyProgressEvent::new(
                    files_transferred,
                    options.total_files,
                ));
            }
        }
    }

    let status = child.wait()?;
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if !status.success() {
        let mut stderr_text = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            use std::io::Read;
            let _ = stderr.read_to_string(&mut stderr_text);
        }
        return Err(CopyError::ProcessFailed {
            program: program.to_string(),
            stderr: stderr_text,
        });
    }

    log::info!(
        "copy of {} completed in {elapsed_ms}ms, {files_transferred} file(s) observed via progress",
        source.display()
    );

    Ok(parse_stats(&collected_output, elapsed_ms))
}

/// Run `program` in a non-mutating mode and count the files it would
/// transfer, for driving the percentage in later progress events.
///
/// # Errors
///
/// Same as [`copy`], minus [`CopyError::ProcessFailed`]'s stats concerns.
pub fn estimate_file_count(
    program: &str,
    source: &Path,
    destination: &Path,
    copy_cfg: &CopyConfig,
    additional_excludes: &[String],
) -> Result<u64, CopyError> {
    if !probe_installed(program) {
        return Err(CopyError::ProgramMissing {
            program: program.to_string(),
        });
    }

    let mut args = build_args(source, destination, copy_cfg, additional_excludes);
    args.push("--dry-run".to_string());
    args.push("--stats".to_string());

    let output = Command::new(program)
        .args(&args)
        .output()
        .map_err(|source| CopyError::SpawnFailed {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(CopyError::ProcessFailed {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let stats = parse_stats(&text, 0);
    Ok(stats.files_transferred.max(
        text.lines()
            .filter(|l| parse_progress_line(l).is_file_name)
            .count() as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_fails_fast() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = CopyConfig::default();
        let tx = Transaction::new(|_| {});
        let result = copy(
            "definitely-not-a-real-copy-program-xyz",
            dir.path(),
            dir.path(),
            &cfg,
            CopyOptions::default(),
            &tx,
        );
        assert!(matches!(result, Err(CopyError::ProgramMissing { .. })));
    }

    #[test]
    fn managed_flags_are_inserted_before_the_path_pair() {
        let base = build_args(
            Path::new("/src"),
            Path::new("/dst"),
            &CopyConfig::default(),
            &[],
        );
        let version = VersionInfo {
            installed: true,
            major: Some(3),
            minor: Some(2),
            supports_progress: true,
            supports_stats: true,
        };
        let args = with_managed_flags(base, version);

        assert_eq!(args[args.len() - 2], "/src/");
        assert_eq!(args[args.len() - 1], "/dst");
        assert!(args.contains(&"--progress".to_string()));
        assert!(args.contains(&"--stats".to_string()));
    }

    #[test]
    fn unsupported_version_adds_no_managed_flags() {
        let base = build_args(
            Path::new("/src"),
            Path::new("/dst"),
            &CopyConfig::default(),
            &[],
        );
        let version = VersionInfo {
            installed: true,
            major: Some(2),
            minor: Some(0),
            supports_progress: false,
            supports_stats: false,
        };
        let args = with_managed_flags(base, version);

        assert!(!args.contains(&"--progress".to_string()));
        assert!(!args.contains(&"--stats".to_string()));
    }
}
