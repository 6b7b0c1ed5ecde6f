//! worktree-setup CLI entry point.
//!
//! A thin shell around `worktree_setup_orchestrator` and
//! `worktree_setup_git`: argument parsing, interactive prompts, and
//! human/JSON rendering. None of the orchestration core lives here.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod interactive;
mod output;
mod progress;

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;

use args::{AddArgs, Args, Command, ConfigArgs, GoArgs, ListArgs, RemoveArgs};
use progress::ProgressReporter;
use worktree_setup_git::{
    discover_repo, get_current_branch, get_local_branches, get_main_worktree, get_repo_root,
    get_worktrees, WorktreeCreateOptions, WorktreeInfo,
};
use worktree_setup_orchestrator::{GitRepoVcs, SetupOptions, SetupOrchestrator};

fn main() {
    let args = Args::parse();

    if args.verbose {
        // SAFETY: set before any other threads are spawned (pretty_env_logger
        // hasn't initialized yet and no worker threads exist at this point).
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    pretty_env_logger::init();

    let result = match args.command {
        Command::Add(add_args) => cmd_add(add_args),
        Command::List(list_args) => cmd_list(list_args),
        Command::Remove(remove_args) => cmd_remove(remove_args),
        Command::Go(go_args) => cmd_go(go_args),
        Command::Config(config_args) => cmd_config(config_args),
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Resolve `path` to an absolute path against `cwd` without requiring it to
/// exist yet.
fn make_absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Compare two paths for equality, canonicalizing when both exist so
/// platform path aliasing (e.g. macOS `/tmp` -> `/private/tmp`) doesn't
/// cause a false mismatch.
fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

fn find_worktree(worktrees: &[WorktreeInfo], path: &Path) -> Option<WorktreeInfo> {
    worktrees.iter().find(|wt| same_path(&wt.path, path)).cloned()
}

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let repo_root = get_repo_root(&repo)?;
    let target_path = make_absolute(&args.path, &cwd);

    let main_worktree = get_main_worktree(&repo)?;
    if same_path(&target_path, &main_worktree.path) {
        return Err("cannot set up the main worktree; this tool is for secondary worktrees".into());
    }

    let (resolved, _provenance) = worktree_setup_config::resolve_config(&repo_root, None)?;

    let mut created_new_branch = false;
    let mut rebase_base: Option<String> = None;

    if !target_path.exists() {
        let create_options = if args.force || args.branch.is_some() || args.new_branch.is_some() {
            WorktreeCreateOptions {
                branch: args.branch.clone(),
                new_branch: args.new_branch.clone(),
                force: args.force,
                ..WorktreeCreateOptions::default()
            }
        } else if args.is_interactive() {
            let current_branch = get_current_branch(&repo)?;
            let branches = get_local_branches(&repo)?;
            match interactive::prompt_worktree_create(
                &target_path,
                current_branch.as_deref(),
                &branches,
                main_worktree.branch.as_deref(),
            )? {
                Some(options) => options,
                None => {
                    println!("Aborted.");
                    return Ok(());
                }
            }
        } else {
            return Err(
                "target worktree does not exist; pass --branch/--new-branch or drop --non-interactive"
                    .into(),
            );
        };

        created_new_branch = create_options.new_branch.is_some();
        rebase_base = create_options.branch.clone();

        println!("Creating worktree at {}...", target_path.display());
        worktree_setup_git::create_worktree(&repo, &target_path, &create_options)?;
    }

    if !target_path.exists() {
        return Err(format!("target path does not exist: {}", target_path.display()).into());
    }

    let worktrees = get_worktrees(&repo)?;
    let target_info = find_worktree(&worktrees, &target_path)
        .ok_or_else(|| format!("worktree at {} not found after creation", target_path.display()))?;

    let mut rebased = false;
    let mut rebase_source: Option<String> = None;
    if resolved.worktree.rebase_on_add {
        let onto = rebase_base
            .or_else(|| main_worktree.branch.clone())
            .filter(|_| created_new_branch || rebase_base.is_some());
        if let Some(onto_branch) = onto {
            if target_info.branch.as_deref() != Some(onto_branch.as_str()) {
                rebased = worktree_setup_git::rebase_branch_in_worktree(&target_path, &onto_branch);
                rebase_source = Some(onto_branch);
            }
        }
    }

    if !args.json {
        output::print_header("Worktree Setup");
        output::print_repo_info(&repo_root.to_string_lossy());
        println!("Main worktree: {}", main_worktree.path.display());
        println!("Target:        {}\n", target_path.display());
    }

    let reporter = ProgressReporter::new(args.should_show_progress());
    let vcs = GitRepoVcs::new(repo);
    let orchestrator = SetupOrchestrator::new(vcs, resolved.copy, resolved.link);

    let options = SetupOptions {
        skip_copy: args.skip_copy,
        skip_link: args.skip_link,
        on_progress: Some(Box::new(reporter.sink())),
        ..SetupOptions::default()
    };

    let outcome = orchestrator.setup_new_worktree(&target_path, options);
    reporter.clear();

    match outcome {
        Ok(result) => {
            if args.json {
                let value = output::setup_result_json(
                    &result,
                    &target_path.to_string_lossy(),
                    target_info.branch.as_deref(),
                    target_info.commit.as_deref(),
                    rebased,
                    rebase_source.as_deref(),
                );
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                output::print_setup_summary(&result, &target_path.to_string_lossy());
            }
            Ok(())
        }
        Err(err) => {
            if args.json {
                let value = output::setup_result_json(
                    &err.result,
                    &target_path.to_string_lossy(),
                    target_info.branch.as_deref(),
                    target_info.commit.as_deref(),
                    rebased,
                    rebase_source.as_deref(),
                );
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                output::print_setup_summary(&err.result, &target_path.to_string_lossy());
            }
            Err(Box::new(err))
        }
    }
}

fn cmd_list(args: ListArgs) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let worktrees = get_worktrees(&repo)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output::worktree_list_json(&worktrees))?);
    } else {
        output::print_worktree_table(&worktrees);
    }
    Ok(())
}

fn cmd_remove(args: RemoveArgs) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let repo_root = get_repo_root(&repo)?;
    let target_path = make_absolute(&args.path, &cwd);

    let worktrees = get_worktrees(&repo)?;
    let target_info = find_worktree(&worktrees, &target_path)
        .ok_or_else(|| format!("no worktree found at {}", target_path.display()))?;

    if !args.force && !args.non_interactive && !interactive::prompt_confirm_remove(&target_path)? {
        println!("Aborted.");
        return Ok(());
    }

    worktree_setup_git::remove_worktree(&repo, &target_path, args.force)?;
    println!("Removed worktree at {}", target_path.display());

    let (resolved, _) = worktree_setup_config::resolve_config(&repo_root, None)?;
    if let Some(branch) = &target_info.branch {
        use worktree_setup_config::DeleteBranchMode;
        match resolved.worktree.delete_branch_on_remove {
            DeleteBranchMode::None => {}
            DeleteBranchMode::Local => {
                worktree_setup_git::delete_local_branch(&repo, branch)?;
                println!("Deleted local branch {branch}");
            }
            DeleteBranchMode::Remote => {
                worktree_setup_git::delete_local_branch(&repo, branch)?;
                println!("Deleted local branch {branch}");
                if let Err(e) = worktree_setup_git::delete_remote_branch(&repo, "origin", branch) {
                    output::print_warning(&format!("failed to delete remote branch: {e}"));
                }
            }
        }
    }

    Ok(())
}

fn cmd_go(args: GoArgs) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let worktrees = get_worktrees(&repo)?;

    let candidate = PathBuf::from(&args.target);
    let by_path = find_worktree(&worktrees, &make_absolute(&candidate, &cwd));
    let resolved = by_path.or_else(|| {
        worktrees
            .iter()
            .find(|wt| wt.branch.as_deref() == Some(args.target.as_str()))
            .cloned()
    });

    match resolved {
        Some(wt) => {
            println!("{}", wt.path.display());
            Ok(())
        }
        None => Err(format!("no worktree matches path or branch {:?}", args.target).into()),
    }
}

fn cmd_config(args: ConfigArgs) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    let repo = discover_repo(&cwd)?;
    let repo_root = get_repo_root(&repo)?;

    let (resolved, provenance) = worktree_setup_config::resolve_config(&repo_root, None)?;

    if args.json {
        let provenance_json: serde_json::Map<String, serde_json::Value> = provenance
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(format!("{v:?}"))))
            .collect();
        let value = serde_json::json!({
            "copy": {
                "enabled": resolved.copy.enabled,
                "flags": resolved.copy.flags,
                "exclude": resolved.copy.exclude,
            },
            "link": {
                "patterns": resolved.link.patterns,
                "relative": resolved.link.relative,
                "beforeCopy": resolved.link.before_copy,
            },
            "worktree": {
                "defaultParent": resolved.worktree.default_parent,
                "rebaseOnAdd": resolved.worktree.rebase_on_add,
                "deleteBranchOnRemove": format!("{:?}", resolved.worktree.delete_branch_on_remove),
            },
            "provenance": provenance_json,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("copy.enabled         = {}", resolved.copy.enabled);
    println!("copy.flags            = {:?}", resolved.copy.flags);
    println!("copy.exclude          = {:?}", resolved.copy.exclude);
    println!("link.patterns         = {:?}", resolved.link.patterns);
    println!("link.relative         = {}", resolved.link.relative);
    println!("link.beforeCopy       = {}", resolved.link.before_copy);
    println!("worktree.defaultParent = {:?}", resolved.worktree.default_parent);
    println!("worktree.rebaseOnAdd  = {}", resolved.worktree.rebase_on_add);
    println!(
        "worktree.deleteBranchOnRemove = {:?}",
        resolved.worktree.delete_branch_on_remove
    );
    println!("\nprovenance:");
    let mut keys: Vec<_> = provenance.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {key} <- {:?}", provenance[key]);
    }

    Ok(())
}
