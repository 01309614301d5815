//! Structural tracker: brace/paren depth and expected indentation.

use crate::context::{LineIndent, LineKind};
use crate::malformed;
use crate::token::{Token, TokenKind};
use crate::types::Diagnostic;

/// Indentation frame pushed for every open brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentFrame {
    /// Width at which the opening and closing braces sit.
    pub opener_width: usize,
    /// Width of the statements inside the block.
    pub body_width: usize,
    /// Set once a `case`/`default` label has been seen in this block.
    pub in_case: bool,
}

impl IndentFrame {
    /// Width of ordinary statements at this point of the block.
    #[must_use]
    pub fn effective_width(&self, indent_width: usize) -> usize {
        if self.in_case {
            self.body_width + indent_width
        } else {
            self.body_width
        }
    }
}

/// Per-file mutable state carried across lines.
///
/// Owned by the engine for the duration of one file; rules only ever see
/// a shared reference to the snapshot taken at the start of each line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Whether the line starts inside a block comment.
    pub in_block_comment: bool,
    /// Count of unmatched `{`.
    pub brace_depth: usize,
    /// Count of unmatched `(`.
    pub paren_depth: usize,
    /// One frame per open brace, innermost last.
    pub indent_stack: Vec<IndentFrame>,
}

/// What the leading whitespace of a line must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentExpectation {
    /// Exactly this many columns.
    Exact(usize),
    /// At least this many columns (continuation lines).
    AtLeast(usize),
    /// Not checked (blank, comment, directive and label lines).
    Unchecked,
}

/// The tracker's view of one line, taken before the line is applied.
#[derive(Debug, Clone)]
pub struct LineObservation {
    /// Scan state at the start of the line.
    pub state: ScanState,
    /// Indentation measurement for the line.
    pub indent: LineIndent,
    /// Structural problems found on the line.
    pub diagnostics: Vec<Diagnostic>,
}

/// Maintains [`ScanState`] from the tokens of each line.
#[derive(Debug, Clone)]
pub struct StructuralTracker {
    indent_width: usize,
    state: ScanState,
    continuation: bool,
    after_case_label: bool,
}

impl StructuralTracker {
    /// Creates a tracker for a fresh file.
    #[must_use]
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width,
            state: ScanState::default(),
            continuation: false,
            after_case_label: false,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Observes one line and advances the state past it.
    pub fn observe(
        &mut self,
        number: usize,
        text: &str,
        kind: LineKind,
        tokens: &[Token<'_>],
        starts_in_comment: bool,
    ) -> LineObservation {
        self.state.in_block_comment = starts_in_comment;
        let snapshot = self.state.clone();

        let expected = self.expectation(text, kind, tokens, starts_in_comment);
        let indent = LineIndent::measure(text, expected);

        let mut diagnostics = Vec::new();
        if kind == LineKind::Code {
            if starts_case_label(tokens) {
                if let Some(frame) = self.state.indent_stack.last_mut() {
                    frame.in_case = true;
                }
            }
            // `case 1:` followed by a `{` line: the brace sits with the label.
            let mut label_block = self.after_case_label
                && tokens.first().is_some_and(|t| t.kind == TokenKind::OpenBrace);
            for token in tokens {
                self.apply(number, token, std::mem::take(&mut label_block), &mut diagnostics);
            }
            self.continuation = tokens
                .last()
                .is_some_and(|t| !matches!(t.text, ";" | "{" | "}" | ":"));
            self.after_case_label =
                starts_case_label(tokens) && tokens.last().is_some_and(|t| t.is(":"));
        }

        LineObservation {
            state: snapshot,
            indent,
            diagnostics,
        }
    }

    fn expectation(
        &self,
        text: &str,
        kind: LineKind,
        tokens: &[Token<'_>],
        starts_in_comment: bool,
    ) -> IndentExpectation {
        if kind != LineKind::Code || starts_in_comment {
            return IndentExpectation::Unchecked;
        }
        let Some(first) = tokens.first() else {
            return IndentExpectation::Unchecked;
        };
        // A comment before the first token owns the line's alignment.
        if !text[..first.column].trim().is_empty() {
            return IndentExpectation::Unchecked;
        }

        let frame = self.state.indent_stack.last();
        let base = frame.map_or(0, |f| f.effective_width(self.indent_width));
        let in_parens = self.state.paren_depth > 0;
        let exact_or_at_least = |width| {
            if in_parens {
                IndentExpectation::AtLeast(width)
            } else {
                IndentExpectation::Exact(width)
            }
        };

        match first.kind {
            TokenKind::CloseBrace => exact_or_at_least(frame.map_or(0, |f| f.opener_width)),
            TokenKind::OpenBrace if self.after_case_label => {
                exact_or_at_least(frame.map_or(0, |f| f.body_width))
            }
            TokenKind::OpenBrace => exact_or_at_least(base),
            _ if starts_case_label(tokens) => {
                exact_or_at_least(frame.map_or(0, |f| f.body_width))
            }
            _ if is_plain_label(tokens) => IndentExpectation::Unchecked,
            _ if self.continuation || in_parens => IndentExpectation::AtLeast(base),
            _ => IndentExpectation::Exact(base),
        }
    }

    fn apply(
        &mut self,
        number: usize,
        token: &Token<'_>,
        label_block: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match token.kind {
            TokenKind::OpenParen => self.state.paren_depth += 1,
            TokenKind::CloseParen => {
                self.state.paren_depth = self.state.paren_depth.saturating_sub(1);
            }
            TokenKind::OpenBrace => {
                let opener_width = self.state.indent_stack.last().map_or(0, |f| {
                    if label_block {
                        f.body_width
                    } else {
                        f.effective_width(self.indent_width)
                    }
                });
                self.state.indent_stack.push(IndentFrame {
                    opener_width,
                    body_width: opener_width + self.indent_width,
                    in_case: false,
                });
                self.state.brace_depth += 1;
            }
            TokenKind::CloseBrace => {
                if self.state.brace_depth == 0 {
                    diagnostics.push(malformed::unmatched_brace(number, token.column));
                } else {
                    self.state.indent_stack.pop();
                    self.state.brace_depth -= 1;
                }
            }
            _ => {}
        }
        debug_assert_eq!(
            self.state.brace_depth,
            self.state.indent_stack.len(),
            "indent stack out of step with brace depth"
        );
    }
}

/// Returns true for `case ...:` and `default:` lines.
fn starts_case_label(tokens: &[Token<'_>]) -> bool {
    match tokens {
        [first, second, ..] if first.is("default") => second.is(":"),
        [first, ..] if first.is("case") => tokens.iter().any(|t| t.is(":")),
        _ => false,
    }
}

/// Returns true for goto labels and access specifiers (`out:`, `public:`).
fn is_plain_label(tokens: &[Token<'_>]) -> bool {
    match tokens {
        [name, colon, ..] => {
            colon.is(":")
                && (name.kind == TokenKind::Identifier
                    || matches!(name.text, "public" | "private" | "protected"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use crate::token::tokenize;

    /// Runs the tracker over `source`, returning each line's expectation.
    fn expectations(source: &str) -> (Vec<IndentExpectation>, StructuralTracker, Vec<Diagnostic>) {
        let mut scanner = Scanner::new();
        let mut tracker = StructuralTracker::new(4);
        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let starts_in_comment = scanner.in_block_comment();
            let scanned = scanner.scan_line(line);
            let tokens = tokenize(line, &scanned.spans);
            let kind = LineKind::classify(line, &scanned.spans, &tokens, starts_in_comment);
            let observed = tracker.observe(idx + 1, line, kind, &tokens, starts_in_comment);
            out.push(observed.indent.expected);
            diagnostics.extend(observed.diagnostics);
        }
        (out, tracker, diagnostics)
    }

    use IndentExpectation::{AtLeast, Exact, Unchecked};

    #[test]
    fn nested_blocks_indent_by_width() {
        let (exp, tracker, diags) = expectations("int main()\n{\n    if ( x )\n    {\n        y;\n    }\n}");
        assert_eq!(
            exp,
            vec![Exact(0), Exact(0), Exact(4), Exact(4), Exact(8), Exact(4), Exact(0)]
        );
        assert_eq!(tracker.state().brace_depth, 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn braceless_body_is_continuation() {
        let (exp, _, _) = expectations("{\n    if ( x )\n        return;\n    y;\n}");
        assert_eq!(exp[2], AtLeast(4));
        assert_eq!(exp[3], Exact(4));
    }

    #[test]
    fn wrapped_arguments_are_at_least_block_width() {
        let (exp, _, _) = expectations("{\n    f( a,\n       b );\n    g;\n}");
        assert_eq!(exp[2], AtLeast(4));
        assert_eq!(exp[3], Exact(4));
    }

    #[test]
    fn case_bodies_indent_one_level_deeper() {
        let source = "switch ( x )\n{\n    case 1:\n        a;\n        break;\n    default:\n        b;\n}\nc;";
        let (exp, _, _) = expectations(source);
        assert_eq!(
            exp,
            vec![
                Exact(0),
                Exact(0),
                Exact(4),
                Exact(8),
                Exact(8),
                Exact(4),
                Exact(8),
                Exact(0),
                Exact(0)
            ]
        );
    }

    #[test]
    fn braced_case_block_sits_with_its_label() {
        let source = "switch ( x )\n{\n    case 1:\n    {\n        a;\n        break;\n    }\n    case 2:\n        if ( y )\n        {\n            b;\n        }\n}";
        let (exp, tracker, _) = expectations(source);
        assert_eq!(
            exp,
            vec![
                Exact(0),
                Exact(0),
                Exact(4),
                Exact(4),
                Exact(8),
                Exact(8),
                Exact(4),
                Exact(4),
                Exact(8),
                Exact(8),
                Exact(12),
                Exact(8),
                Exact(0)
            ]
        );
        assert_eq!(tracker.state().brace_depth, 0);
    }

    #[test]
    fn labels_and_comments_are_unchecked() {
        let (exp, _, _) = expectations("{\nout:\n    /* c */ x;\n  // note\n#if X\n}");
        assert_eq!(exp[1], Unchecked);
        assert_eq!(exp[2], Unchecked);
        assert_eq!(exp[3], Unchecked);
        assert_eq!(exp[4], Unchecked);
    }

    #[test]
    fn excess_closing_braces_clamp_at_zero() {
        let (_, tracker, diags) = expectations("}\n}\n{\n}\n}");
        assert_eq!(tracker.state().brace_depth, 0);
        assert!(tracker.state().indent_stack.is_empty());
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(|d| d.rule == malformed::UNMATCHED_BRACE));
        assert_eq!(diags[2].location.line, 5);
    }

    #[test]
    fn snapshot_is_taken_before_the_line() {
        let mut tracker = StructuralTracker::new(4);
        let line = "void f() {";
        let scanned = Scanner::new().scan_line(line);
        let tokens = tokenize(line, &scanned.spans);
        let observed = tracker.observe(1, line, LineKind::Code, &tokens, false);
        assert_eq!(observed.state.brace_depth, 0);
        assert_eq!(tracker.state().brace_depth, 1);
        assert_eq!(tracker.state().indent_stack[0].body_width, 4);
    }
}
