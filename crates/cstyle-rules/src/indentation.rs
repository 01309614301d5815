//! Rule checking leading whitespace against the block structure.
//!
//! The expected width of each line is computed by the engine's structural
//! tracker; this rule only compares. Tabs in the indentation are always
//! reported, once per line.

use cstyle_core::{
    Diagnostic, IndentExpectation, LineCheck, LineContext, LineKind, Rule, Severity, Suggestion,
};

/// Rule code for indentation.
pub const CODE: &str = "CS007";

/// Rule name for indentation.
pub const NAME: &str = "indentation";

/// Requires space indentation matching the brace depth.
#[derive(Debug, Clone)]
pub struct Indentation {
    /// Severity level.
    pub severity: Severity,
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Indentation {
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

impl Rule for Indentation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Lines must be indented with spaces, one level per enclosing block"
    }

    fn example(&self) -> &'static str {
        "int main()\n{\n    if ( x )\n    {\n        y = 1;\n    }\n}\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(IndentCheck {
            severity: self.severity,
        })
    }
}

struct IndentCheck {
    severity: Severity,
}

impl IndentCheck {
    fn report(&self, line: &LineContext<'_>, message: String, help: &str) -> Vec<Diagnostic> {
        vec![
            Diagnostic::new(CODE, NAME, self.severity, line.location(0), message)
                .with_suggestion(Suggestion::new(help)),
        ]
    }
}

impl LineCheck for IndentCheck {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        let indent = line.indent;

        if indent.has_tab && line.kind != LineKind::Blank {
            return self.report(
                line,
                "tab character in indentation".to_string(),
                "indent with spaces only",
            );
        }

        match indent.expected {
            IndentExpectation::Exact(width) if indent.actual != width => self.report(
                line,
                format!("expected indentation of {width} spaces, found {}", indent.actual),
                "indent by one level per enclosing block",
            ),
            IndentExpectation::AtLeast(width) if indent.actual < width => self.report(
                line,
                format!(
                    "expected continuation indented at least {width} spaces, found {}",
                    indent.actual
                ),
                "indent continuation lines at least as deep as the statement",
            ),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::{Config, Engine};

    fn check_with(code: &str, indent_width: usize) -> Vec<Diagnostic> {
        let config = Config {
            indent_width,
            ..Config::default()
        };
        Engine::builder()
            .rule(Indentation::new())
            .config(config)
            .build()
            .expect("engine builds")
            .check_source(code)
            .diagnostics
            .into_iter()
            .filter(|d| d.code == CODE)
            .collect()
    }

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check_with(code, 4)
    }

    #[test]
    fn test_nested_blocks_are_clean() {
        let code = "int main()\n{\n    if ( x )\n    {\n        y = 1;\n    }\n    return 0;\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_reports_expected_and_actual() {
        let diagnostics = check_code("void f()\n{\n  x = 1;\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 3);
        assert_eq!(
            diagnostics[0].message,
            "expected indentation of 4 spaces, found 2"
        );
    }

    #[test]
    fn test_closing_brace_uses_block_depth() {
        let diagnostics = check_code("void f()\n{\n    x = 1;\n    }\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 4);
        assert!(diagnostics[0].message.contains("of 0 spaces"));
    }

    #[test]
    fn test_tab_reported_once_per_line() {
        let diagnostics = check_code("{\n\t\tx = 1;\n \t y;\n}\n");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.message.contains("tab")));
    }

    #[test]
    fn test_configured_width() {
        let code = "{\n  x;\n  {\n    y;\n  }\n}\n";
        assert!(check_with(code, 2).is_empty());
        assert_eq!(check_with(code, 4).len(), 4);
    }

    #[test]
    fn test_continuation_may_go_deeper() {
        let code = "{\n    call( first,\n          second );\n    int x = a +\n        b;\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_continuation_must_not_go_shallower() {
        let diagnostics = check_code("{\n    call( first,\n  second );\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("at least 4"));
    }

    #[test]
    fn test_comment_and_directive_lines_are_unchecked() {
        let code = "{\n/* flush left */\n  // odd\n#ifdef X\n    x;\n#endif\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_switch_layout() {
        let code = "switch ( c )\n{\n    case 1:\n        a();\n        break;\n    default:\n        b();\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_braced_case_block() {
        let code = "switch ( x )\n{\n    case 1:\n    {\n        a;\n        break;\n    }\n}\n";
        assert!(check_code(code).is_empty());

        let deeper = "switch ( x )\n{\n    case 1:\n        {\n            a;\n        }\n}\n";
        assert_eq!(check_code(deeper).len(), 3);
    }

    #[test]
    fn test_macro_bodies_are_unchecked() {
        let code = "#define OPEN_BLOCK \\\n    {\nint f()\n{\n    return 0;\n}\n";
        assert!(check_code(code).is_empty());
    }
}
