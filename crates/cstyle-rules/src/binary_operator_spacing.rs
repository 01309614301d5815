//! Rule requiring one space on each side of binary operators.
//!
//! # Detected Patterns
//!
//! `1+2`, `a  == b`, `x =y` for arithmetic, comparison, logical, bitwise,
//! shift and assignment operators.
//!
//! Not checked:
//! - unary uses of `+ - * &` (after another operator, an opening bracket,
//!   `,`, `;`, a keyword, or at the start of the line)
//! - pointer and reference declarators glued to their type (`char* p`,
//!   `( foo_t* )`, `const T& v`)
//! - the outer side of an operator that starts or ends a wrapped line
//! - template angle brackets
//!
//! # Good Patterns
//!
//! ```c
//! int x = 1 + 2 * -y;
//! struct sample* ob = &instance;
//! ```

use cstyle_core::{Diagnostic, LineCheck, LineContext, Rule, Severity, Suggestion, Token, TokenKind};

/// Rule code for binary-operator-spacing.
pub const CODE: &str = "CS004";

/// Rule name for binary-operator-spacing.
pub const NAME: &str = "binary-operator-spacing";

const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "=", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "<<", ">>", "&", "|", "^",
];

const MAYBE_UNARY: &[&str] = &["+", "-", "*", "&"];

/// Requires exactly one space around binary operators.
#[derive(Debug, Clone)]
pub struct BinaryOperatorSpacing {
    /// Severity level.
    pub severity: Severity,
}

impl Default for BinaryOperatorSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryOperatorSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for BinaryOperatorSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Binary operators must have exactly one space on each side"
    }

    fn example(&self) -> &'static str {
        "int x = 1 + 2 - 3 * 4 / 5 % 6;\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(OperatorCheck {
            severity: self.severity,
        })
    }
}

struct OperatorCheck {
    severity: Severity,
}

impl LineCheck for OperatorCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        let tokens = line.tokens;
        let mut diagnostics = Vec::new();

        for (i, op) in tokens.iter().enumerate() {
            if op.kind != TokenKind::Operator || !BINARY_OPERATORS.contains(&op.text) {
                continue;
            }
            let previous = i.checked_sub(1).map(|p| &tokens[p]);
            if previous.is_some_and(|p| p.is("operator")) {
                continue;
            }
            if MAYBE_UNARY.contains(&op.text) && is_unary_context(previous) {
                continue;
            }
            if is_declarator(line, op, previous) {
                continue;
            }

            let mut problems = Vec::new();
            if !line.starts_line(op.column) {
                let gap = line.gap_before(op.column);
                if gap != 1 {
                    problems.push(format!("{gap} spaces before"));
                }
            }
            if !line.ends_line(op.end()) {
                let gap = line.gap_after(op.end());
                if gap != 1 {
                    problems.push(format!("{gap} spaces after"));
                }
            }

            if !problems.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        line.location(op.column),
                        format!(
                            "expected one space around `{}`, found {}",
                            op.text,
                            problems.join(" and ")
                        ),
                    )
                    .with_suggestion(Suggestion::new(format!("write `a {} b`", op.text))),
                );
            }
        }
        diagnostics
    }
}

/// Returns true when an operator following `previous` is unary.
fn is_unary_context(previous: Option<&Token<'_>>) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    match previous.kind {
        TokenKind::Operator | TokenKind::Keyword | TokenKind::OpenParen | TokenKind::OpenBrace => {
            true
        }
        TokenKind::Punctuation => matches!(previous.text, "[" | "," | ";"),
        _ => false,
    }
}

/// Returns true for `*`/`&` glued to a type name and followed by a gap or
/// a closing token, as in `char* p` or `( foo_t* )`.
fn is_declarator(line: &LineContext<'_>, op: &Token<'_>, previous: Option<&Token<'_>>) -> bool {
    if !matches!(op.text, "*" | "&") {
        return false;
    }
    let glued_to_type = previous.is_some_and(|p| {
        p.end() == op.column
            && matches!(
                p.kind,
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::CloseAngle
            )
    });
    glued_to_type
        && line
            .byte_at(op.end())
            .map_or(true, |b| matches!(b, b' ' | b'\t' | b')' | b',' | b'*' | b'&' | b'>'))
}
