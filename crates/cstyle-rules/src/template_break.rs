//! Rule keeping a template header bound to its declaration.
//!
//! A line consisting of `template <...>` must be followed by the
//! declaration it introduces without a blank line in between. Comment and
//! preprocessor lines between the two are allowed.
//!
//! # Good Patterns
//!
//! ```cpp
//! template <class P>
//! void updateMenuList( P*, struct menu* );
//! ```

use cstyle_core::{
    Diagnostic, LineCheck, LineContext, LineKind, Rule, Severity, Suggestion, Token, TokenKind,
};
use tracing::trace;

/// Rule code for template-declaration-break.
pub const CODE: &str = "CS006";

/// Rule name for template-declaration-break.
pub const NAME: &str = "template-declaration-break";

/// Forbids blank lines between a template header and its declaration.
#[derive(Debug, Clone)]
pub struct TemplateDeclarationBreak {
    /// Severity level.
    pub severity: Severity,
}

impl Default for TemplateDeclarationBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateDeclarationBreak {
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

impl Rule for TemplateDeclarationBreak {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "A template header must not be separated from its declaration by a blank line"
    }

    fn example(&self) -> &'static str {
        "template <class P>\nvoid updateMenuList( P*, struct menu* );\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(TemplateCheck {
            severity: self.severity,
            state: TemplateState::Idle,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateState {
    Idle,
    AwaitingDeclaration { header: usize, reported: bool },
}

struct TemplateCheck {
    severity: Severity,
    state: TemplateState,
}

impl LineCheck for TemplateCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        match line.kind {
            LineKind::Comment | LineKind::Preprocessor => Vec::new(),
            LineKind::Code => {
                self.state = if is_template_header(line.tokens) {
                    trace!(line = line.number, "template header awaiting its declaration");
                    TemplateState::AwaitingDeclaration {
                        header: line.number,
                        reported: false,
                    }
                } else {
                    TemplateState::Idle
                };
                Vec::new()
            }
            LineKind::Blank => match self.state {
                TemplateState::AwaitingDeclaration {
                    header,
                    reported: false,
                } => {
                    self.state = TemplateState::AwaitingDeclaration {
                        header,
                        reported: true,
                    };
                    vec![Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        line.location(0),
                        format!("blank line between the template header on line {header} and its declaration"),
                    )
                    .with_suggestion(Suggestion::new(
                        "remove the blank line so the declaration follows the header",
                    ))]
                }
                _ => Vec::new(),
            },
        }
    }
}

/// Returns true if the line is exactly `template <...>`.
fn is_template_header(tokens: &[Token<'_>]) -> bool {
    let [first, second, ..] = tokens else {
        return false;
    };
    if first.kind != TokenKind::Keyword || !first.is("template") || second.kind != TokenKind::OpenAngle {
        return false;
    }

    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(1) {
        match token.kind {
            TokenKind::OpenAngle => depth += 1,
            TokenKind::CloseAngle => {
                depth = depth.saturating_sub(token.text.len());
                if depth == 0 {
                    return idx == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::Engine;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        Engine::builder()
            .rule(TemplateDeclarationBreak::new())
            .build()
            .expect("engine builds")
            .check_source(code)
            .diagnostics
            .into_iter()
            .filter(|d| d.code == CODE)
            .collect()
    }

    #[test]
    fn test_adjacent_declaration_is_clean() {
        assert!(check_code("template <class P>\nvoid f( P* );\n").is_empty());
    }

    #[test]
    fn test_detects_blank_line() {
        let diagnostics = check_code("template <class P>\n\nvoid f( P* );\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 2);
        assert!(diagnostics[0].message.contains("line 1"));
    }

    #[test]
    fn test_several_blank_lines_report_once() {
        assert_eq!(check_code("template <class P>\n\n\n\nvoid f( P* );\n").len(), 1);
    }

    #[test]
    fn test_comments_between_are_neutral() {
        assert!(check_code("template <class P>\n// note\nvoid f( P* );\n").is_empty());
        assert_eq!(check_code("template <class P>\n// note\n\nvoid f( P* );\n").len(), 1);
    }

    #[test]
    fn test_single_line_template_is_not_a_header() {
        assert!(check_code("template <class T> void g( T );\n\nint x;\n").is_empty());
    }

    #[test]
    fn test_nested_template_header() {
        let code = "template <class T = std::vector<int>>\n\nstruct s;\n";
        assert_eq!(check_code(code).len(), 1);
    }

    #[test]
    fn test_identifier_named_template_is_ignored() {
        assert!(check_code("template = 3;\n\nint y;\n").is_empty());
    }

    #[test]
    fn test_blank_after_declaration_is_fine() {
        assert!(check_code("template <class P>\nvoid f( P* );\n\nint z;\n").is_empty());
    }
}
