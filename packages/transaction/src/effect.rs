//! Recorded effects and their metadata.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of reversible effect recorded in the transaction ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// A symbolic link was created.
    CreateLink,
    /// The bulk-copy program populated a destination subtree.
    BulkCopy,
    /// A directory was created.
    CreateDir,
    /// A file was deleted.
    DeleteFile,
}

/// Small keyed bag of metadata attached to an [`Effect`].
///
/// `BulkCopy` carries `destination`, `CreateLink` carries `target`; kept as
/// a flat vec rather than a map since effects never carry more than a
/// couple of entries.
#[derive(Debug, Clone, Default)]
pub struct EffectMetadata {
    entries: Vec<(String, PathBuf)>,
}

impl EffectMetadata {
    /// Create an empty metadata bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a key/value pair, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&std::path::Path> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_path())
    }
}

/// One mutating effect, recorded only after it has already succeeded.
#[derive(Debug, Clone)]
pub struct Effect {
    /// What kind of mutation this was.
    pub kind: EffectKind,
    /// The filesystem path the mutation applies to.
    pub path: PathBuf,
    /// Extra metadata needed to compensate the effect.
    pub metadata: EffectMetadata,
    /// When the effect was recorded.
    pub timestamp: SystemTime,
}
