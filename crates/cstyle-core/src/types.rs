//! Core types for style diagnostics and check results.

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for style diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style issue that should be addressed.
    Warning,
    /// Malformed input or a rule escalated by configuration.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position of a diagnostic inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte column within the line (0-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A suggested way to resolve a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A style violation found while checking a file.
///
/// Diagnostics are immutable once handed to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "CS001").
    pub code: String,
    /// Rule id (e.g., "include-order").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the violation was found.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Sort key: position first, rule id as tie-breaker.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize, &str) {
        (self.location.line, self.location.column, self.rule.as_str())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line,
            self.location.column + 1,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A diagnostic bound to its source text, for rich rendering with `miette`.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl SourceDiagnostic {
    /// Binds `diagnostic` to the file it was reported for.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, name: &str, source: &str) -> Self {
        let offset = offset_for(source, diagnostic.location);
        Self {
            message: format!("[{}] {}", diagnostic.code, diagnostic.message),
            source_code: NamedSource::new(name, source.to_string()),
            help: diagnostic.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((offset, 1)),
            label_message: diagnostic.rule.clone(),
        }
    }
}

/// Calculates the byte offset of `location` in `source`, clamped to the text.
#[must_use]
pub fn offset_for(source: &str, location: Location) -> usize {
    if location.line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line) in source.split_inclusive('\n').enumerate() {
        if i + 1 == location.line {
            let content = line.trim_end_matches(['\n', '\r']);
            return offset + location.column.min(content.len());
        }
        offset += line.len();
    }

    offset
}

/// The outcome of checking one file: sorted diagnostics plus a clean flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Diagnostics sorted by `(line, column, rule)`.
    pub diagnostics: Vec<Diagnostic>,
    /// True iff `diagnostics` is empty.
    pub clean: bool,
}

impl CheckResult {
    /// Builds a result from diagnostics that are already sorted.
    #[must_use]
    pub fn from_sorted(diagnostics: Vec<Diagnostic>) -> Self {
        let clean = diagnostics.is_empty();
        Self { diagnostics, clean }
    }

    /// Returns true when no rule fired.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns diagnostics reported by the given rule id.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.rule == rule).collect()
    }

    /// Keeps only diagnostics matching `keep`, updating the clean flag.
    #[must_use]
    pub fn retain(mut self, keep: impl Fn(&Diagnostic) -> bool) -> Self {
        self.diagnostics.retain(|d| keep(d));
        self.clean = self.diagnostics.is_empty();
        self
    }
}

/// The check result of one named file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path of the checked file.
    pub path: PathBuf,
    /// Outcome for this file.
    #[serde(flatten)]
    pub result: CheckResult,
}

/// Aggregated results across every checked file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// One report per checked file, in input order.
    pub files: Vec<FileReport>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files checked.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }

    /// Returns true if every file is clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|f| f.result.clean)
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|f| f.result.has_errors())
    }

    /// Iterates over every diagnostic together with its file.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&std::path::Path, &Diagnostic)> {
        self.files.iter().flat_map(|f| {
            f.result
                .diagnostics
                .iter()
                .map(move |d| (f.path.as_path(), d))
        })
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        self.diagnostics()
            .fold((0, 0), |(errors, warnings), (_, d)| match d.severity {
                Severity::Error => (errors + 1, warnings),
                Severity::Warning => (errors, warnings + 1),
            })
    }
}
