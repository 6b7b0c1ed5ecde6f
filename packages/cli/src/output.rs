//! Terminal and JSON output formatting.
//!
//! Human-readable rendering goes through `colored`; machine-readable
//! rendering produces the stable JSON schema from spec §6 so scripts can
//! depend on it across releases.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use colored::Colorize;
use serde_json::{json, Value};

use worktree_setup_git::WorktreeInfo;
use worktree_setup_orchestrator::SetupResult;

/// Print a header message.
pub fn print_header(message: &str) {
    println!("\n{} {}\n", "\u{1F333}", message.bold());
}

/// Print repository info.
pub fn print_repo_info(repo_root: &str) {
    println!("Repository: {}", repo_root.cyan());
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "Warning:".yellow().bold(), message);
}

/// Render a successful or failed [`SetupResult`] as human-readable text.
pub fn print_setup_summary(result: &SetupResult, destination: &str) {
    if result.success {
        println!("{} worktree ready at {}", "\u{2713}".green(), destination.cyan());
    } else {
        println!(
            "{} worktree setup at {} did not complete",
            "\u{2717}".red(),
            destination.cyan()
        );
        if !result.compensated {
            print_warning("compensation did not fully succeed; manual cleanup may be required");
        }
    }

    if let Some(copy) = &result.copy_stats {
        println!(
            "  copy: {} file{} transferred, {} bytes sent",
            copy.files_transferred,
            if copy.files_transferred == 1 { "" } else { "s" },
            copy.bytes_sent
        );
    }
    if let Some(link) = &result.link_stats {
        println!(
            "  link: {} created, {} skipped{}",
            link.created,
            link.skipped,
            if link.conflicts.is_empty() {
                String::new()
            } else {
                format!(", {} conflict(s)", link.conflicts.len())
            }
        );
    }

    for warning in &result.warnings {
        print_warning(warning);
    }

    println!("  ({} ms)", result.duration_ms);
}

/// Build the stable JSON result schema (spec §6) around a [`SetupResult`]
/// and the worktree metadata the CLI already collected.
#[must_use]
pub fn setup_result_json(
    result: &SetupResult,
    worktree_path: &str,
    branch: Option<&str>,
    commit: Option<&str>,
    rebased: bool,
    rebase_source: Option<&str>,
) -> Value {
    let copy = result.copy_stats.as_ref().map(|c| {
        json!({
            "filesTransferred": c.files_transferred,
            "totalBytes": c.total_bytes,
        })
    });

    let link = result.link_stats.as_ref().map(|l| {
        json!({
            "created": l.created,
            "skipped": l.skipped,
            "conflictCount": l.conflicts.len(),
            "conflicts": l.conflicts.iter().map(|c| json!({
                "source": c.source.to_string_lossy(),
                "target": c.target.to_string_lossy(),
                "reason": format!("{:?}", c.reason),
            })).collect::<Vec<_>>(),
        })
    });

    json!({
        "success": result.success,
        "worktree": {
            "path": worktree_path,
            "branch": branch,
            "commit": commit,
            "rebased": rebased,
            "rebaseSource": rebase_source,
        },
        "setup": {
            "copy": copy,
            "link": link,
        },
        "duration": result.duration_ms,
        "warnings": result.warnings,
    })
}

/// Print a list of worktrees as a formatted table.
pub fn print_worktree_table(worktrees: &[WorktreeInfo]) {
    for wt in worktrees {
        let marker = if wt.is_main { "*".green() } else { " ".normal() };
        let branch = wt.branch.as_deref().unwrap_or("(detached)");
        let commit = wt.commit.as_deref().unwrap_or("?");
        println!(
            "{} {:<40} {:<24} {}",
            marker,
            wt.path.display(),
            branch.yellow(),
            commit.dimmed()
        );
    }
}

/// Render worktrees as a JSON array.
#[must_use]
pub fn worktree_list_json(worktrees: &[WorktreeInfo]) -> Value {
    Value::Array(
        worktrees
            .iter()
            .map(|wt| {
                json!({
                    "path": wt.path.to_string_lossy(),
                    "isMain": wt.is_main,
                    "branch": wt.branch,
                    "commit": wt.commit,
                    "isPrunable": wt.is_prunable,
                    "isExistingBranch": wt.is_existing_branch,
                })
            })
            .collect(),
    )
}
