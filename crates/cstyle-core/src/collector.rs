//! Accumulates diagnostics for one file and hands them out sorted.

use crate::types::{CheckResult, Diagnostic};

/// Collects diagnostics during a file scan.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    sorted: bool,
}

impl DiagnosticCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
        self.sorted = false;
    }

    /// Adds several diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        let before = self.diagnostics.len();
        self.diagnostics.extend(diagnostics);
        if self.diagnostics.len() != before {
            self.sorted = false;
        }
    }

    /// Number of diagnostics collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the diagnostics sorted by `(line, column, rule)`.
    ///
    /// Sorting is stable and happens at most once per batch of pushes, so
    /// repeated calls return the same sequence.
    pub fn finalize(&mut self) -> CheckResult {
        if !self.sorted {
            self.diagnostics
                .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            self.sorted = true;
        }
        CheckResult::from_sorted(self.diagnostics.clone())
    }
}
