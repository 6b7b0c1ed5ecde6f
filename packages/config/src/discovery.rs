//! Locating the dedicated config file, a project manifest's embedded
//! section, and the user's global config file (spec §6).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

/// Filename of the dedicated repo-root config file.
pub const REPO_CONFIG_FILENAME: &str = "worktree-setup.toml";

/// The dotted-key table a project manifest embeds settings under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `pyproject.toml`, embedded under `[tool.worktree-setup]`.
    Python,
    /// `Cargo.toml`, embedded under `[package.metadata.worktree-setup]`.
    NativeManifest,
    /// `package.json`, embedded under the top-level `"worktree-setup"` key.
    Node,
    /// `deno.json`, embedded under the top-level `"worktree-setup"` key.
    Deno,
    /// `composer.json`, embedded under `"extra"."worktree-setup"`.
    Php,
}

impl ManifestKind {
    /// The dotted path at which this manifest embeds worktree-setup
    /// settings.
    #[must_use]
    pub fn embed_path(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["tool", "worktree-setup"],
            Self::NativeManifest => &["package", "metadata", "worktree-setup"],
            Self::Node | Self::Deno => &["worktree-setup"],
            Self::Php => &["extra", "worktree-setup"],
        }
    }

    /// Whether this manifest is TOML (vs. JSON).
    #[must_use]
    pub fn is_toml(self) -> bool {
        matches!(self, Self::Python | Self::NativeManifest)
    }
}

/// A discovered project manifest and which embed convention applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    /// Absolute path to the manifest file.
    pub path: PathBuf,
    /// Which manifest format/embed convention this is.
    pub kind: ManifestKind,
}

const MANIFEST_CANDIDATES: &[(&str, ManifestKind)] = &[
    ("pyproject.toml", ManifestKind::Python),
    ("Cargo.toml", ManifestKind::NativeManifest),
    ("package.json", ManifestKind::Node),
    ("deno.json", ManifestKind::Deno),
    ("composer.json", ManifestKind::Php),
];

/// Find the dedicated repo-root config file, if present.
#[must_use]
pub fn discover_repo_config(repo_root: &Path) -> Option<PathBuf> {
    let candidate = repo_root.join(REPO_CONFIG_FILENAME);
    candidate.is_file().then_some(candidate)
}

/// Find the first recognized project manifest at the repo root.
///
/// Only one manifest is consulted even if several are present, in the fixed
/// order above (Python, then the native-manifest format, then the
/// JavaScript/TypeScript runtimes, then PHP).
#[must_use]
pub fn discover_project_manifest(repo_root: &Path) -> Option<ManifestLocation> {
    for (filename, kind) in MANIFEST_CANDIDATES {
        let path = repo_root.join(filename);
        if path.is_file() {
            log::debug!("using {:?} manifest at {}", kind, path.display());
            return Some(ManifestLocation { path, kind: *kind });
        }
    }
    None
}

/// Path to the user's global config file, if a config directory can be
/// determined for this platform.
#[must_use]
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("worktree-setup").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_dedicated_repo_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REPO_CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            discover_repo_config(dir.path()),
            Some(dir.path().join(REPO_CONFIG_FILENAME))
        );
    }

    #[test]
    fn missing_repo_config_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(discover_repo_config(dir.path()), None);
    }

    #[test]
    fn prefers_pyproject_over_cargo_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();

        let found = discover_project_manifest(dir.path()).unwrap();
        assert_eq!(found.kind, ManifestKind::Python);
    }

    #[test]
    fn falls_back_to_cargo_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();

        let found = discover_project_manifest(dir.path()).unwrap();
        assert_eq!(found.kind, ManifestKind::NativeManifest);
        assert_eq!(found.embed_path(), &["package", "metadata", "worktree-setup"]);
    }
}
