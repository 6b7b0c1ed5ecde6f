//! Layered configuration resolution for worktree-setup (spec §6).
//!
//! Six layers are consulted, highest precedence first: CLI overrides,
//! environment variables, a dedicated repo-root config file
//! (`worktree-setup.toml`), a section embedded in a recognized project
//! manifest, the user's global config file, and built-in defaults. Layers
//! merge leaf-by-leaf: a layer that doesn't set a given key leaves whatever
//! the next-lower layer already set in place. Array-valued keys (`flags`,
//! `exclude`, `patterns`) are replaced wholesale by the highest layer that
//! sets them, never concatenated.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod env_loader;
mod error;
mod manifest_loader;
mod merge;
mod toml_loader;
mod types;

use std::path::Path;

pub use discovery::{discover_project_manifest, discover_repo_config, global_config_path, ManifestKind, ManifestLocation, REPO_CONFIG_FILENAME};
pub use env_loader::load_env_values;
pub use error::ConfigError;
pub use manifest_loader::load_project_manifest;
pub use merge::{apply_layer, merge_layers};
pub use toml_loader::load_toml_values;
pub use types::{builtin_defaults, ConfigSource, ConfigValues, CopyValues, DeleteBranchMode, LinkValues, Provenance, ResolvedConfig, WorktreeValues};

/// Resolve the full configuration for a repository, applying every layer in
/// precedence order.
///
/// `cli_overlay`, when given, is treated as the highest-precedence layer —
/// the values a CLI invocation's flags produced.
///
/// # Errors
///
/// Returns [`ConfigError`] if a discovered config file or project-manifest
/// section exists but cannot be read or parsed. A missing file at any layer
/// is not an error; that layer is simply skipped.
pub fn resolve_config(
    repo_root: &Path,
    cli_overlay: Option<&ConfigValues>,
) -> Result<(ResolvedConfig, Provenance), ConfigError> {
    let mut layers = vec![(ConfigSource::BuiltinDefault, ConfigValues::default())];

    if let Some(global_path) = global_config_path() {
        if global_path.is_file() {
            layers.push((ConfigSource::GlobalConfig, load_toml_values(&global_path)?));
        }
    }

    if let Some(manifest) = discover_project_manifest(repo_root) {
        layers.push((ConfigSource::ProjectManifest, load_project_manifest(&manifest)?));
    }

    if let Some(repo_config_path) = discover_repo_config(repo_root) {
        layers.push((ConfigSource::RepoConfig, load_toml_values(&repo_config_path)?));
    }

    layers.push((ConfigSource::Env, load_env_values()));

    if let Some(cli_values) = cli_overlay {
        layers.push((ConfigSource::Cli, cli_values.clone()));
    }

    Ok(merge_layers(builtin_defaults(), &layers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolves_repo_config_over_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"example\"\n\n[package.metadata.worktree-setup]\ncopy = { enabled = false }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(REPO_CONFIG_FILENAME),
            "[copy]\nenabled = true\n",
        )
        .unwrap();

        let (resolved, provenance) = resolve_config(dir.path(), None).unwrap();
        assert!(resolved.copy.enabled);
        assert_eq!(provenance.get("copy.enabled"), Some(&ConfigSource::RepoConfig));
    }

    #[test]
    fn cli_overlay_wins_over_everything() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REPO_CONFIG_FILENAME), "[copy]\nenabled = true\n").unwrap();

        let mut cli = ConfigValues::default();
        cli.copy.enabled = Some(false);

        let (resolved, provenance) = resolve_config(dir.path(), Some(&cli)).unwrap();
        assert!(!resolved.copy.enabled);
        assert_eq!(provenance.get("copy.enabled"), Some(&ConfigSource::Cli));
    }

    #[test]
    fn no_config_anywhere_yields_builtin_defaults() {
        let dir = TempDir::new().unwrap();
        let (resolved, provenance) = resolve_config(dir.path(), None).unwrap();
        assert!(resolved.copy.enabled);
        assert!(resolved.link.patterns.is_empty());
        assert!(provenance.is_empty());
    }
}
