//! Rule forbidding spaces around `.` and `->`.
//!
//! # Detected Patterns
//!
//! `ob1 -> a`, `ob . a`, `ob. a`
//!
//! A `.` after `{` or `,` starts a designated initializer and is skipped.
//! A member access that begins a wrapped line is only checked on its
//! right side.
//!
//! # Good Patterns
//!
//! ```c
//! ob.a = 10;
//! ob1->a = 10;
//! struct point p = { .x = 1, .y = 2 };
//! ```

use cstyle_core::{Diagnostic, LineCheck, LineContext, Rule, Severity, Suggestion, TokenKind};

/// Rule code for member-access-spacing.
pub const CODE: &str = "CS005";

/// Rule name for member-access-spacing.
pub const NAME: &str = "member-access-spacing";

/// Forbids whitespace around member-access operators.
#[derive(Debug, Clone)]
pub struct MemberAccessSpacing {
    /// Severity level.
    pub severity: Severity,
}

impl Default for MemberAccessSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberAccessSpacing {
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

impl Rule for MemberAccessSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Member access operators `.` and `->` must not be surrounded by spaces"
    }

    fn example(&self) -> &'static str {
        "ob.a = 10;\nob1->a = 10;\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(MemberAccessCheck {
            severity: self.severity,
        })
    }
}

struct MemberAccessCheck {
    severity: Severity,
}

impl LineCheck for MemberAccessCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        let tokens = line.tokens;
        let mut diagnostics = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Operator || !matches!(token.text, "." | "->") {
                continue;
            }
            let designator = token.is(".")
                && i
                    .checked_sub(1)
                    .is_some_and(|p| matches!(tokens[p].text, "{" | ","));
            if designator {
                continue;
            }

            let space_before = !line.starts_line(token.column) && line.gap_before(token.column) > 0;
            let space_after = !line.ends_line(token.end()) && line.gap_after(token.end()) > 0;
            let side = match (space_before, space_after) {
                (false, false) => continue,
                (true, false) => "before",
                (false, true) => "after",
                (true, true) => "around",
            };

            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    line.location(token.column),
                    format!("unexpected space {side} `{}`", token.text),
                )
                .with_suggestion(Suggestion::new(format!("write `a{}b`", token.text))),
            );
        }
        diagnostics
    }
}
