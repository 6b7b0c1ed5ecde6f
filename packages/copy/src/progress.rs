//! Progress event type emitted while a copy is running.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// A single progress update emitted when the bulk-copy helper detects a
/// whole-file-completion line in the child program's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyProgressEvent {
    /// Number of files completed so far.
    pub files_transferred: u64,
    /// Total files expected, if an estimate was taken beforehand.
    pub total_files: Option<u64>,
    /// `files_transferred / total_files * 100`, when `total_files` is known.
    pub percentage: Option<f64>,
}

impl CopyProgressEvent {
    #[must_use]
    pub fn new(files_transferred: u64, total_files: Option<u64>) -> Self {
        let percentage = total_files.and_then(|total| {
            if total == 0 {
                None
            } else {
                Some((files_transferred as f64 / total as f64) * 100.0)
            }
        });

        Self {
            files_transferred,
            total_files,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_computed_when_total_known() {
        let event = CopyProgressEvent::new(5, Some(10));
        assert_eq!(event.percentage, Some(50.0));
    }

    #[test]
    fn percentage_absent_without_total() {
        let event = CopyProgressEvent::new(5, None);
        assert_eq!(event.percentage, None);
    }

    #[test]
    fn percentage_absent_when_total_zero() {
        let event = CopyProgressEvent::new(0, Some(0));
        assert_eq!(event.percentage, None);
    }
}
