//! Rule to keep block-opening braces on a line of their own.
//!
//! # Detected Patterns
//!
//! - `if ( x ) {`, `void f() {`, `struct s {` (brace appended to the
//!   controlling line)
//! - `{ x = 1;` (code after the brace)
//!
//! Braces that open an initializer (after `=`, `,`, `(`, `[`, `{` or
//! `return`) are not block openers and are left alone.
//!
//! # Good Patterns
//!
//! ```c
//! if ( x )
//! {
//!     y = 1;
//! }
//! int a[] = { 1, 2 };
//! ```

use cstyle_core::{
    Diagnostic, LineCheck, LineContext, LineKind, Rule, Severity, Suggestion, TokenKind,
};

/// Rule code for brace-placement.
pub const CODE: &str = "CS002";

/// Rule name for brace-placement.
pub const NAME: &str = "brace-placement";

/// Requires block-opening braces to stand alone on their line.
#[derive(Debug, Clone)]
pub struct BracePlacement {
    /// Severity level.
    pub severity: Severity,
}

impl Default for BracePlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl BracePlacement {
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

impl Rule for BracePlacement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Opening braces of blocks must be placed on a line of their own"
    }

    fn example(&self) -> &'static str {
        "int main()\n{\n    return 0;\n}\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(BraceCheck {
            severity: self.severity,
            previous_line_end: None,
        })
    }
}

struct BraceCheck {
    severity: Severity,
    /// Last token of the most recent code line.
    previous_line_end: Option<String>,
}

impl LineCheck for BraceCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        if line.kind != LineKind::Code {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        for (i, token) in line.tokens.iter().enumerate() {
            if token.kind != TokenKind::OpenBrace {
                continue;
            }

            let previous = match i.checked_sub(1) {
                Some(p) => Some(line.tokens[p].text),
                None => self.previous_line_end.as_deref(),
            };
            if previous.is_some_and(opens_initializer) {
                continue;
            }

            let code_before = i > 0;
            let code_after = i + 1 < line.tokens.len();
            if !code_before && !code_after {
                continue;
            }

            let message = if code_before {
                "opening brace should be on its own line, not after the statement"
            } else {
                "code should not follow an opening brace on the same line"
            };
            diagnostics.push(
                Diagnostic::new(CODE, NAME, self.severity, line.location(token.column), message)
                    .with_suggestion(Suggestion::new("move the `{` to a line of its own")),
            );
        }

        if let Some(last) = line.last_token() {
            self.previous_line_end = Some(last.text.to_string());
        }
        diagnostics
    }
}

fn opens_initializer(previous: &str) -> bool {
    matches!(previous, "=" | "," | "(" | "[" | "{" | "return")
}
