//! Rule for spacing around the parentheses of control statements.
//!
//! # Detected Patterns
//!
//! For `if`, `for`, `while` and `switch` followed by `(`:
//! - anything other than exactly one space between the keyword and `(`
//! - no space just inside `(` or just inside the matching `)`
//!
//! All problems of one keyword are reported together. A condition whose
//! closing parenthesis sits on a later line is only checked up to the end
//! of the line.
//!
//! # Good Patterns
//!
//! ```c
//! if ( x > 0 )
//! while ( running )
//! for ( i = 0; i < n; i++ )
//! ```

use cstyle_core::{Diagnostic, LineCheck, LineContext, Rule, Severity, Suggestion, Token, TokenKind};

/// Rule code for keyword-paren-spacing.
pub const CODE: &str = "CS003";

/// Rule name for keyword-paren-spacing.
pub const NAME: &str = "keyword-paren-spacing";

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch"];

/// Enforces `keyword ( condition )` spacing.
#[derive(Debug, Clone)]
pub struct KeywordParenSpacing {
    /// Severity level.
    pub severity: Severity,
}

impl Default for KeywordParenSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordParenSpacing {
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

impl Rule for KeywordParenSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Control keywords take one space before `(` and spaces inside the parentheses"
    }

    fn example(&self) -> &'static str {
        "if ( x == 1 )\n{\n    y = 2;\n}\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(KeywordParenCheck {
            severity: self.severity,
        })
    }
}

struct KeywordParenCheck {
    severity: Severity,
}

impl LineCheck for KeywordParenCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        let tokens = line.tokens;
        let mut diagnostics = Vec::new();

        for (i, keyword) in tokens.iter().enumerate() {
            if keyword.kind != TokenKind::Keyword || !CONTROL_KEYWORDS.contains(&keyword.text) {
                continue;
            }
            let Some(open) = tokens.get(i + 1).filter(|t| t.kind == TokenKind::OpenParen) else {
                continue;
            };

            let problems = problems(line, keyword, open, matching_paren(tokens, i + 1));
            if !problems.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        line.location(keyword.column),
                        format!("`{}` statement: {}", keyword.text, problems.join("; ")),
                    )
                    .with_suggestion(Suggestion::new(format!("write `{} ( ... )`", keyword.text))),
                );
            }
        }
        diagnostics
    }
}

fn problems(
    line: &LineContext<'_>,
    keyword: &Token<'_>,
    open: &Token<'_>,
    close: Option<&Token<'_>>,
) -> Vec<String> {
    let mut problems = Vec::new();

    let gap = open.column - keyword.end();
    if gap != 1 {
        problems.push(format!(
            "expected one space between `{}` and `(`, found {gap}",
            keyword.text
        ));
    }

    let empty = close.is_some_and(|c| line.text[open.end()..c.column].trim().is_empty());
    if empty {
        return problems;
    }

    if !line.ends_line(open.end()) && line.gap_after(open.end()) == 0 {
        problems.push("expected a space after `(`".to_string());
    }
    if let Some(close) = close {
        if line.gap_before(close.column) == 0 {
            problems.push("expected a space before `)`".to_string());
        }
    }
    problems
}

/// Finds the `)` closing the `(` at `open`, if it is on this line.
fn matching_paren<'t, 'a>(tokens: &'t [Token<'a>], open: usize) -> Option<&'t Token<'a>> {
    let mut depth = 0usize;
    for token in &tokens[open..] {
        match token.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(token);
                }
            }
            _ => {}
        }
    }
    None
}
