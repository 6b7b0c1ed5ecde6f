//! Parsing the bulk-copy program's streamed output.
//!
//! The program has at least two widely-deployed dialects for its final
//! statistics block; this module tolerates both and falls back to zeros
//! for anything it doesn't recognize rather than failing the copy.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::OnceLock;

use regex::Regex;

use crate::CopyStats;

/// Classification of a single line of streamed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressLineClass {
    /// Whether this line signals a whole file finished transferring.
    pub is_file_complete: bool,
    /// Whether this line looks like a bare filename (not stats, not a
    /// progress ratio line).
    pub is_file_name: bool,
}

fn xfer_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(xfer#\d+, to-check=\d+/\d+\)").expect("static pattern"))
}

const STATS_PREFIXES: &[&str] = &[
    "Number of files",
    "Number of created files",
    "Number of deleted files",
    "Number of regular files transferred",
    "Total file size",
    "Total transferred file size",
    "Literal data",
    "Matched data",
    "File list size",
    "File list generation time",
    "File list transfer time",
    "Total bytes sent",
    "Total bytes received",
    "sent ",
    "total size is",
];

fn is_stats_line(line: &str) -> bool {
    STATS_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Classify a single line of bulk-copy output.
///
/// A completed-file line carries the literal `(xfer#N, to-check=a/b)`
/// token alongside a `100%` marker — that combination is the reliable
/// signal across dialects, per the program's own inconsistent formatting
/// of everything else on the line.
#[must_use]
pub fn parse_progress_line(line: &str) -> ProgressLineClass {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return ProgressLineClass::default();
    }

    let stats_line = is_stats_line(trimmed);
    let has_xfer_token = xfer_token_regex().is_match(trimmed);
    let has_full_percentage = trimmed.contains("100%");

    ProgressLineClass {
        is_file_complete: has_xfer_token && has_full_percentage,
        is_file_name: !stats_line && !trimmed.contains('%'),
    }
}

fn parse_number(raw: &str) -> u64 {
    raw.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn extract_first(output: &str, labels: &[&str]) -> Option<u64> {
    for label in labels {
        let pattern = format!(r"{}:\s*([0-9][0-9,]*)", regex::escape(label));
        let re = Regex::new(&pattern).ok()?;
        if let Some(captures) = re.captures(output) {
            return Some(parse_number(&captures[1]));
        }
    }
    None
}

fn extract_sent_bytes(output: &str) -> Option<u64> {
    if let Some(value) = extract_first(output, &["Total bytes sent"]) {
        return Some(value);
    }
    let re = Regex::new(r"sent\s+([0-9][0-9,]*)\s*bytes").ok()?;
    re.captures(output)
        .map(|captures| parse_number(&captures[1]))
}

/// Parse the final statistics block, if any. Unknown formats yield zeros
/// with `success = true` — the program still exited cleanly.
#[must_use]
pub fn parse_stats(output: &str, elapsed_ms: u64) -> CopyStats {
    let files_transferred = extract_first(
        output,
        &[
            "Number of created files",
            "Number of regular files transferred",
            "Number of files transferred",
        ],
    )
    .unwrap_or(0);

    let total_bytes =
        extract_first(output, &["Total file size", "Total transferred file size"]).unwrap_or(0);

    let bytes_sent = extract_sent_bytes(output).unwrap_or(0);

    CopyStats {
        files_transferred,
        bytes_sent,
        total_bytes,
        duration_ms: elapsed_ms,
        success: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_completed_file_line() {
        let line = "file.txt\n          1,234 100%    1.23MB/s    0:00:00 (xfer#1, to-check=4/10)";
        let class = parse_progress_line(line);
        assert!(class.is_file_complete);
    }

    #[test]
    fn classifies_bare_filename_line() {
        let class = parse_progress_line("src/index.ts");
        assert!(class.is_file_name);
        assert!(!class.is_file_complete);
    }

    #[test]
    fn classifies_stats_line_as_not_filename() {
        let class = parse_progress_line("Number of files: 42");
        assert!(!class.is_file_name);
    }

    #[test]
    fn parses_modern_dialect_stats() {
        let output = "\
Number of files: 10
Number of created files: 3
Total file size: 4,096 bytes
Total bytes sent: 512
";
        let stats = parse_stats(output, 12);
        assert_eq!(stats.files_transferred, 3);
        assert_eq!(stats.total_bytes, 4096);
        assert_eq!(stats.bytes_sent, 512);
        assert!(stats.success);
    }

    #[test]
    fn parses_legacy_dialect_stats() {
        let output = "\
Number of regular files transferred: 7
Total transferred file size: 2,048 bytes
sent 1,024 bytes  received 128 bytes  768.00 bytes/sec
";
        let stats = parse_stats(output, 5);
        assert_eq!(stats.files_transferred, 7);
        assert_eq!(stats.total_bytes, 2048);
        assert_eq!(stats.bytes_sent, 1024);
    }

    #[test]
    fn unknown_format_yields_zeros_not_failure() {
        let stats = parse_stats("nonsense output\n", 1);
        assert_eq!(stats.files_transferred, 0);
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.bytes_sent, 0);
        assert!(stats.success);
    }
}
