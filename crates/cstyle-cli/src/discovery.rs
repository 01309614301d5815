//! Source file discovery.

use anyhow::{Context, Result};
use cstyle_core::FilesConfig;
use std::path::{Path, PathBuf};

/// Compiled exclude patterns.
pub struct Excludes {
    patterns: Vec<glob::Pattern>,
}

impl Excludes {
    /// Compiles glob patterns.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid pattern.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
            .collect::<Result<_>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if `path` (or its part below `root`) matches a pattern.
    #[must_use]
    pub fn matches(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.patterns
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(relative))
    }
}

/// Collects the files to check below `paths`.
///
/// Files named explicitly are always kept; files found by walking a
/// directory must carry a configured extension and escape the excludes.
/// The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist or an exclude pattern is
/// invalid.
pub fn discover(paths: &[PathBuf], files: &FilesConfig) -> Result<Vec<PathBuf>> {
    let excludes = Excludes::new(&files.exclude)?;
    let mut found = Vec::new();

    for root in paths {
        if root.is_file() {
            found.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("No such file or directory: {}", root.display());
        }

        let walker = ignore::WalkBuilder::new(root)
            .git_ignore(files.respect_gitignore)
            .git_global(files.respect_gitignore)
            .git_exclude(files.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if !files.matches_extension(path) {
                continue;
            }
            if excludes.matches(path, root) {
                tracing::debug!("Excluding: {}", path.display());
                continue;
            }
            found.push(entry.into_path());
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}
