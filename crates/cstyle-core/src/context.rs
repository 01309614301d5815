//! Context types for rule execution.

use crate::scanner::{Span, SpanKind};
use crate::token::Token;
use crate::tracker::{IndentExpectation, ScanState};
use crate::types::Location;

/// Structural classification of a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Empty or whitespace only, outside any comment.
    Blank,
    /// Only comment text (and whitespace).
    Comment,
    /// A preprocessor directive.
    Preprocessor,
    /// Contains at least one code or literal token.
    Code,
}

impl LineKind {
    /// Classifies a scanned line.
    #[must_use]
    pub fn classify(line: &str, spans: &[Span], tokens: &[Token<'_>], starts_in_comment: bool) -> Self {
        if spans.first().is_some_and(|s| s.kind == SpanKind::Preprocessor) {
            Self::Preprocessor
        } else if !tokens.is_empty() {
            Self::Code
        } else if !starts_in_comment && line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Comment
        }
    }
}

/// Measured leading whitespace of a line and what the tracker expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIndent {
    /// Width of the leading whitespace in bytes.
    pub actual: usize,
    /// Whether the leading whitespace contains a tab.
    pub has_tab: bool,
    /// Expected width derived from the structural depth.
    pub expected: IndentExpectation,
}

impl LineIndent {
    /// Measures the leading whitespace of `line`.
    #[must_use]
    pub fn measure(line: &str, expected: IndentExpectation) -> Self {
        let leading = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        Self {
            actual: leading.len(),
            has_tab: leading.contains('\t'),
            expected,
        }
    }
}

/// Context provided to rules for one line.
///
/// Everything is borrowed read-only: rules observe the scan state but never
/// change it.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// Line number (1-indexed).
    pub number: usize,
    /// Raw line text without the line terminator.
    pub text: &'a str,
    /// Structural classification.
    pub kind: LineKind,
    /// Scanner spans covering the line.
    pub spans: &'a [Span],
    /// Tokens of the code and literal spans.
    pub tokens: &'a [Token<'a>],
    /// Scan state at the start of the line.
    pub state: &'a ScanState,
    /// Indentation measurement for the line.
    pub indent: &'a LineIndent,
}

impl<'a> LineContext<'a> {
    /// Returns a location on this line.
    #[must_use]
    pub fn location(&self, column: usize) -> Location {
        Location::new(self.number, column)
    }

    /// Returns true if the line is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }

    /// Returns the first token, if any.
    #[must_use]
    pub fn first_token(&self) -> Option<&Token<'a>> {
        self.tokens.first()
    }

    /// Returns the last token, if any.
    #[must_use]
    pub fn last_token(&self) -> Option<&Token<'a>> {
        self.tokens.last()
    }

    /// Returns the byte just before `column`, if any.
    #[must_use]
    pub fn byte_before(&self, column: usize) -> Option<u8> {
        column
            .checked_sub(1)
            .and_then(|i| self.text.as_bytes().get(i).copied())
    }

    /// Returns the byte at `column`, if any.
    #[must_use]
    pub fn byte_at(&self, column: usize) -> Option<u8> {
        self.text.as_bytes().get(column).copied()
    }

    /// Returns true if only whitespace precedes `column`.
    #[must_use]
    pub fn starts_line(&self, column: usize) -> bool {
        self.text[..column].trim().is_empty()
    }

    /// Returns true if nothing but whitespace and comments follows `end`.
    #[must_use]
    pub fn ends_line(&self, end: usize) -> bool {
        self.spans
            .iter()
            .filter(|s| s.end > end)
            .all(|s| {
                s.kind.is_comment() || self.text[s.start.max(end)..s.end].trim().is_empty()
            })
    }

    /// Counts the spaces and tabs immediately before `column`.
    #[must_use]
    pub fn gap_before(&self, column: usize) -> usize {
        self.text.as_bytes()[..column]
            .iter()
            .rev()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count()
    }

    /// Counts the spaces and tabs starting at `column`.
    #[must_use]
    pub fn gap_after(&self, column: usize) -> usize {
        self.text.as_bytes()[column..]
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count()
    }
}
