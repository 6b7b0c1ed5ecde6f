//! Interactive prompts using dialoguer.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io;
use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use worktree_setup_git::WorktreeCreateOptions;

/// Prompt for which branch to base a new branch off.
///
/// Returns `None` for current HEAD, `Some(branch)` for a specific branch/ref.
///
/// # Errors
///
/// * If the user cancels the prompts
fn prompt_base_branch(default_branch: Option<&str>) -> io::Result<Option<String>> {
    let mut options = vec!["Current HEAD".to_string()];

    if let Some(branch) = default_branch {
        options.push(branch.to_string());
    }

    options.push("Enter custom branch/ref...".to_string());

    let choice = Select::new()
        .with_prompt("Base the new branch off")
        .items(&options)
        .default(0)
        .interact()?;

    let last_idx = options.len() - 1;

    if choice == 0 {
        Ok(None)
    } else if choice == last_idx {
        let custom: String = Input::new()
            .with_prompt("Enter branch name or ref")
            .interact_text()?;
        Ok(Some(custom))
    } else {
        Ok(Some(options[choice].clone()))
    }
}

/// Prompt for worktree creation options.
///
/// Returns `None` if the user doesn't want to create a worktree.
///
/// # Errors
///
/// * If the user cancels the prompts
pub fn prompt_worktree_create(
    target_path: &Path,
    current_branch: Option<&str>,
    branches: &[String],
    default_branch: Option<&str>,
) -> io::Result<Option<WorktreeCreateOptions>> {
    let should_create = Confirm::new()
        .with_prompt(format!(
            "Worktree does not exist at {}. Create it?",
            target_path.display()
        ))
        .default(true)
        .interact()?;

    if !should_create {
        return Ok(None);
    }

    let worktree_name = target_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("worktree");

    let mut options: Vec<String> = Vec::new();
    let mut option_values: Vec<&str> = Vec::new();

    options.push(format!("New branch (auto-named '{worktree_name}')"));
    option_values.push("auto");

    options.push("New branch (custom name)...".to_string());
    option_values.push("new");

    if let Some(branch) = current_branch {
        options.push(format!("Use current branch ({branch})"));
        option_values.push("current");
    }

    options.push("Use existing branch...".to_string());
    option_values.push("existing");

    options.push("Detached HEAD (current commit)".to_string());
    option_values.push("detach");

    let choice = Select::new()
        .with_prompt("How should the worktree be created?")
        .items(&options)
        .default(0)
        .interact()?;

    let selected_value = option_values[choice];

    let result = match selected_value {
        "auto" => {
            let base_branch = prompt_base_branch(default_branch)?;
            if base_branch.is_some() {
                WorktreeCreateOptions {
                    new_branch: Some(worktree_name.to_string()),
                    branch: base_branch,
                    ..WorktreeCreateOptions::default()
                }
            } else {
                WorktreeCreateOptions::default()
            }
        }
        "new" => {
            let branch_name: String = Input::new()
                .with_prompt("Enter new branch name")
                .interact_text()?;

            let base_branch = prompt_base_branch(default_branch)?;

            WorktreeCreateOptions {
                new_branch: Some(branch_name),
                branch: base_branch,
                ..WorktreeCreateOptions::default()
            }
        }
        "current" => WorktreeCreateOptions {
            branch: current_branch.map(String::from),
            ..WorktreeCreateOptions::default()
        },
        "existing" => {
            if branches.is_empty() {
                println!("No local branches found. Using auto-named branch instead.");
                WorktreeCreateOptions::default()
            } else {
                let branch_idx = Select::new()
                    .with_prompt("Select branch")
                    .items(branches)
                    .interact()?;

                WorktreeCreateOptions {
                    branch: Some(branches[branch_idx].clone()),
                    ..WorktreeCreateOptions::default()
                }
            }
        }
        "detach" => WorktreeCreateOptions {
            detach: true,
            ..WorktreeCreateOptions::default()
        },
        _ => unreachable!(),
    };

    Ok(Some(result))
}

/// Confirm removal of a worktree.
///
/// # Errors
///
/// * If the user cancels the prompt
pub fn prompt_confirm_remove(path: &Path) -> io::Result<bool> {
    Confirm::new()
        .with_prompt(format!("Remove worktree at {}?", path.display()))
        .default(false)
        .interact()
}
