//! Probing and caching the bulk-copy program's presence and version.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

/// What the helper learned about the installed bulk-copy program.
///
/// `supports_progress`/`supports_stats` gate whether the helper asks the
/// program for per-file progress and a final statistics block; older
/// versions are driven without those flags and fall back to the
/// best-effort output parsing in [`crate::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    /// Whether the program could be located and executed at all.
    pub installed: bool,
    /// Major version component, if a version line could be parsed.
    pub major: Option<u32>,
    /// Minor version component, if a version line could be parsed.
    pub minor: Option<u32>,
    /// Whether the discovered version supports per-file progress output.
    pub supports_progress: bool,
    /// Whether the discovered version supports a final statistics block.
    pub supports_stats: bool,
}

impl VersionInfo {
    const fn not_installed() -> Self {
        Self {
            installed: false,
            major: None,
            minor: None,
            supports_progress: false,
            supports_stats: false,
        }
    }
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.\d+)?").expect("static pattern"))
}

/// Probe whether `program` can be invoked at all.
#[must_use]
pub fn probe_installed(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Run `<program> --version` and parse the version line permissively.
///
/// Any version line containing a `major.minor` pair is accepted; the
/// specific program banner format is not otherwise validated.
#[must_use]
pub fn probe_version(program: &str) -> VersionInfo {
    let Ok(output) = Command::new(program).arg("--version").output() else {
        return VersionInfo::not_installed();
    };

    if !output.status.success() {
        return VersionInfo::not_installed();
    }

    let banner = String::from_utf8_lossy(&output.stdout);
    let Some(captures) = version_regex().captures(&banner) else {
        return VersionInfo {
            installed: true,
            major: None,
            minor: None,
            supports_progress: false,
            supports_stats: false,
        };
    };

    let major: u32 = captures[1].parse().unwrap_or(0);
    let minor: u32 = captures[2].parse().unwrap_or(0);

    // rsync gained --info=progress2 / machine-parseable --stats in the 3.x
    // line; older 2.x releases support neither reliably.
    let supports_progress = major >= 3;
    let supports_stats = major >= 3 || (major == 2 && minor >= 6);

    VersionInfo {
        installed: true,
        major: Some(major),
        minor: Some(minor),
        supports_progress,
        supports_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_installed_has_no_version() {
        let info = probe_version("definitely-not-a-real-binary-xyz");
        assert!(!info.installed);
        assert_eq!(info.major, None);
    }
}
