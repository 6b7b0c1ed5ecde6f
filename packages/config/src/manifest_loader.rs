//! Extracting the embedded `worktree-setup` section from a project manifest.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;

use serde::Deserialize;

use crate::discovery::ManifestLocation;
use crate::error::ConfigError;
use crate::types::ConfigValues;

/// Load and extract the embedded config section named by `manifest.kind`.
///
/// Returns the default (all-`None`) values if the manifest exists but has no
/// section at the expected path — an ordinary project manifest with no
/// interest in worktree-setup.
///
/// # Errors
///
/// * If the manifest cannot be read.
/// * If the manifest is not valid TOML/JSON.
/// * If the embedded section doesn't match the expected shape.
pub fn load_project_manifest(manifest: &ManifestLocation) -> Result<ConfigValues, ConfigError> {
    let content = fs::read_to_string(&manifest.path).map_err(|source| ConfigError::ReadError {
        path: manifest.path.clone(),
        source,
    })?;

    if manifest.kind.is_toml() {
        load_toml_section(&content, manifest)
    } else {
        load_json_section(&content, manifest)
    }
}

fn load_toml_section(content: &str, manifest: &ManifestLocation) -> Result<ConfigValues, ConfigError> {
    let root: toml::Value = toml::from_str(content).map_err(|source| ConfigError::TomlManifestParseError {
        path: manifest.path.clone(),
        source,
    })?;

    let Some(section) = navigate_toml(&root, manifest.kind.embed_path()) else {
        return Ok(ConfigValues::default());
    };

    ConfigValues::deserialize(section.clone()).map_err(|source| ConfigError::TomlManifestParseError {
        path: manifest.path.clone(),
        source,
    })
}

fn load_json_section(content: &str, manifest: &ManifestLocation) -> Result<ConfigValues, ConfigError> {
    let root: serde_json::Value =
        serde_json::from_str(content).map_err(|source| ConfigError::JsonManifestParseError {
            path: manifest.path.clone(),
            source,
        })?;

    let Some(section) = navigate_json(&root, manifest.kind.embed_path()) else {
        return Ok(ConfigValues::default());
    };

    ConfigValues::deserialize(section.clone()).map_err(|source| ConfigError::JsonManifestParseError {
        path: manifest.path.clone(),
        source,
    })
}

fn navigate_toml<'a>(root: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    let mut current = root;
    for key in path {
        current = current.as_table()?.get(*key)?;
    }
    Some(current)
}

fn navigate_json<'a>(root: &'a serde_json::Value, path: &[&str]) -> Option<&'a serde_json::Value> {
    let mut current = root;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ManifestKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_python_manifest_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pyproject.toml");
        fs::write(
            &path,
            r#"
[project]
name = "example"

[tool.worktree-setup]
copy = { enabled = false }
link = { patterns = ["package.json"] }
"#,
        )
        .unwrap();

        let values = load_project_manifest(&ManifestLocation {
            path,
            kind: ManifestKind::Python,
        })
        .unwrap();

        assert_eq!(values.copy.enabled, Some(false));
        assert_eq!(values.link.patterns, Some(vec!["package.json".to_string()]));
    }

    #[test]
    fn reads_node_manifest_top_level_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(
            &path,
            r#"{
  "name": "example",
  "worktree-setup": { "worktree": { "rebaseOnAdd": true } }
}"#,
        )
        .unwrap();

        let values = load_project_manifest(&ManifestLocation {
            path,
            kind: ManifestKind::Node,
        })
        .unwrap();

        assert_eq!(values.worktree.rebase_on_add, Some(true));
    }

    #[test]
    fn missing_section_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nname = \"example\"\n").unwrap();

        let values = load_project_manifest(&ManifestLocation {
            path,
            kind: ManifestKind::NativeManifest,
        })
        .unwrap();

        assert!(values.copy.enabled.is_none());
    }
}
