//! Limits a report to the lines touched by a unified diff.
//!
//! Only the new side of each hunk matters: `+++ b/path` names the file (one
//! leading path component is stripped) and `@@ -a,b +c,d @@` marks lines
//! `c..c+d-1` as changed. Hunks that add nothing are ignored, so files that
//! only lose lines drop out of the report.

use anyhow::{Context, Result};
use cstyle_core::{CheckResult, FilesConfig};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Changed line ranges per file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChangedLines {
    files: BTreeMap<PathBuf, Vec<RangeInclusive<usize>>>,
}

impl ChangedLines {
    /// Reads and parses a diff file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path, files: &FilesConfig) -> Result<Self> {
        let diff = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff: {}", path.display()))?;
        Ok(Self::parse(&diff, files))
    }

    /// Parses unified diff text, keeping files with a checked extension.
    #[must_use]
    pub fn parse(diff: &str, files: &FilesConfig) -> Self {
        let mut changed = Self::default();
        let mut current: Option<PathBuf> = None;

        for line in diff.lines() {
            if let Some(rest) = line.strip_prefix("+++ ") {
                current = new_side_path(rest).filter(|p| files.matches_extension(p));
                continue;
            }
            let Some(file) = &current else {
                continue;
            };
            if let Some(range) = line.strip_prefix("@@").and_then(added_range) {
                changed.files.entry(file.clone()).or_default().push(range);
            }
        }

        changed
    }

    /// Returns true if no file has changed lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over the files named in the diff.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Returns the changed ranges of `path`, matching the diff's paths
    /// as suffixes so that `./src/a.c` finds `src/a.c`.
    #[must_use]
    pub fn ranges_for(&self, path: &Path) -> Option<&[RangeInclusive<usize>]> {
        let path = path.strip_prefix(".").unwrap_or(path);
        self.files
            .iter()
            .find(|(diff_path, _)| path.ends_with(diff_path))
            .map(|(_, ranges)| ranges.as_slice())
    }

    /// Keeps only diagnostics on changed lines of `path`.
    #[must_use]
    pub fn restrict(&self, path: &Path, result: CheckResult) -> CheckResult {
        let ranges = self.ranges_for(path).unwrap_or(&[]);
        result.retain(|d| ranges.iter().any(|r| r.contains(&d.location.line)))
    }
}

/// Extracts the file from the `+++` header, stripping `b/`.
fn new_side_path(header: &str) -> Option<PathBuf> {
    let name = header.split(['\t', ' ']).next()?;
    if name == "/dev/null" {
        return None;
    }
    let (_, stripped) = name.split_once('/')?;
    (!stripped.is_empty()).then(|| PathBuf::from(stripped))
}

/// Parses the `+c,d` part of a hunk header.
fn added_range(header: &str) -> Option<RangeInclusive<usize>> {
    let new_side = header.split_whitespace().find_map(|part| part.strip_prefix('+'))?;
    let (start, count) = match new_side.split_once(',') {
        Some((start, count)) => (start.parse::<usize>().ok()?, count.parse::<usize>().ok()?),
        None => (new_side.parse::<usize>().ok()?, 1),
    };
    let end = start.checked_add(count.checked_sub(1)?)?;
    Some(start..=end)
}
