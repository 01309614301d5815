//! Diagnostics for malformed input.
//!
//! These are raised by the engine itself rather than by a style rule and
//! cannot be disabled. The scan always continues after reporting them.

use crate::scanner::{SpanKind, UnterminatedLiteral};
use crate::types::{Diagnostic, Location, Severity, Suggestion};

/// Rule id for a string or char literal left open at the end of a line.
pub const UNTERMINATED_LITERAL: &str = "unterminated-literal";
/// Rule id for a block comment still open at the end of the file.
pub const UNTERMINATED_COMMENT: &str = "unterminated-comment";
/// Rule id for a `}` seen at brace depth zero.
pub const UNMATCHED_BRACE: &str = "unmatched-brace";
/// Rule id for braces still open at the end of the file.
pub const UNCLOSED_BRACE: &str = "unclosed-brace";

/// Every engine-level id, for documentation and listing.
pub const ALL: &[(&str, &str)] = &[
    ("CS100", UNTERMINATED_LITERAL),
    ("CS101", UNTERMINATED_COMMENT),
    ("CS102", UNMATCHED_BRACE),
    ("CS103", UNCLOSED_BRACE),
];

/// Reports an unterminated literal found by the scanner.
#[must_use]
pub fn unterminated_literal(line: usize, literal: UnterminatedLiteral) -> Diagnostic {
    let what = match literal.kind {
        SpanKind::CharLiteral => "character literal",
        _ => "string literal",
    };
    Diagnostic::new(
        "CS100",
        UNTERMINATED_LITERAL,
        Severity::Error,
        Location::new(line, literal.column),
        format!("unterminated {what}; the rest of the line is checked as code"),
    )
}

/// Reports a block comment that never closes.
#[must_use]
pub fn unterminated_comment(location: Location) -> Diagnostic {
    Diagnostic::new(
        "CS101",
        UNTERMINATED_COMMENT,
        Severity::Error,
        location,
        "block comment is never closed",
    )
    .with_suggestion(Suggestion::new("add the closing `*/`"))
}

/// Reports a `}` without a matching `{`.
#[must_use]
pub fn unmatched_brace(line: usize, column: usize) -> Diagnostic {
    Diagnostic::new(
        "CS102",
        UNMATCHED_BRACE,
        Severity::Error,
        Location::new(line, column),
        "unmatched closing brace",
    )
}

/// Reports braces left open when the file ends.
#[must_use]
pub fn unclosed_brace(line: usize, depth: usize) -> Diagnostic {
    Diagnostic::new(
        "CS103",
        UNCLOSED_BRACE,
        Severity::Error,
        Location::new(line, 0),
        format!("{depth} brace(s) still open at end of file"),
    )
}
