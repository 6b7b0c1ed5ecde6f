//! Loading a dedicated `worktree-setup.toml`-shaped file: the repo-root
//! config and the user's global config share this exact shape.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::ConfigValues;

/// Parse a standalone TOML file with top-level `[copy]`, `[link]`, and
/// `[worktree]` sections into [`ConfigValues`].
///
/// # Errors
///
/// * If the file cannot be read.
/// * If the file is not valid TOML, or doesn't match the expected shape.
pub fn load_toml_values(path: &Path) -> Result<ConfigValues, ConfigError> {
    log::debug!("loading config from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_full_shape() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[copy]
enabled = true
exclude = ["node_modules"]

[link]
patterns = ["package.json"]
beforeCopy = true

[worktree]
rebaseOnAdd = true
"#
        )
        .unwrap();

        let values = load_toml_values(file.path()).unwrap();
        assert_eq!(values.copy.enabled, Some(true));
        assert_eq!(values.copy.exclude, Some(vec!["node_modules".to_string()]));
        assert_eq!(values.link.patterns, Some(vec!["package.json".to_string()]));
        assert_eq!(values.link.before_copy, Some(true));
        assert_eq!(values.worktree.rebase_on_add, Some(true));
    }

    #[test]
    fn empty_file_yields_all_none() {
        let file = NamedTempFile::new().unwrap();
        let values = load_toml_values(file.path()).unwrap();
        assert_eq!(values.copy.enabled, None);
        assert!(values.link.patterns.is_none());
    }
}
