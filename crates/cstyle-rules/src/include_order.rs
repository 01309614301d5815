//! Rule to keep runs of `#include` lines sorted.
//!
//! # Rationale
//!
//! A sorted include block makes duplicates obvious and keeps merge
//! conflicts to a minimum.
//!
//! # Detected Patterns
//!
//! Within a run of consecutive `#include` lines, a line whose header name
//! (without `<>` or `""`) sorts byte-wise before the name on the line just
//! above it. Any other line ends the run, as does an include of a macro.
//!
//! # Good Patterns
//!
//! ```c
//! #include <stdio.h>
//! #include <unistd.h>
//!
//! #include "local.h"
//! ```

use cstyle_core::{Diagnostic, LineCheck, LineContext, LineKind, Rule, Severity, Suggestion};

/// Rule code for include-order.
pub const CODE: &str = "CS001";

/// Rule name for include-order.
pub const NAME: &str = "include-order";

/// Requires consecutive `#include` lines to be sorted.
#[derive(Debug, Clone)]
pub struct IncludeOrder {
    /// Severity level.
    pub severity: Severity,
}

impl Default for IncludeOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl IncludeOrder {
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

impl Rule for IncludeOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Consecutive #include lines must be sorted by header name"
    }

    fn example(&self) -> &'static str {
        "#include <stdio.h>\n#include <unistd.h>\n"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn checker(&self) -> Box<dyn LineCheck> {
        Box::new(IncludeRun {
            severity: self.severity,
            state: RunState::Idle,
        })
    }
}

enum RunState {
    Idle,
    InRun { previous: String },
}

struct IncludeRun {
    severity: Severity,
    state: RunState,
}

impl LineCheck for IncludeRun {
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
        let include = (line.kind == LineKind::Preprocessor)
            .then(|| parse_include(line.text))
            .flatten();

        let Some(Include::Header(name)) = include else {
            self.state = RunState::Idle;
            return Vec::new();
        };

        let mut diagnostics = Vec::new();
        if let RunState::InRun { previous } = &self.state {
            if name < previous.as_str() {
                let column = line.text.find('#').unwrap_or(0);
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        line.location(column),
                        format!("`{name}` should be included before `{previous}`"),
                    )
                    .with_suggestion(Suggestion::new(
                        "sort consecutive #include lines by header name",
                    )),
                );
            }
        }

        self.state = RunState::InRun {
            previous: name.to_string(),
        };
        diagnostics
    }
}

enum Include<'a> {
    Header(&'a str),
    Macro,
}

/// Extracts the header name from an `#include` directive.
fn parse_include(text: &str) -> Option<Include<'_>> {
    let directive = text.trim_start().strip_prefix('#')?.trim_start();
    let rest = directive.strip_prefix("include")?;
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        // `#include_next` and friends
        return None;
    }
    let rest = rest.trim_start();

    let close = match rest.chars().next() {
        Some('<') => '>',
        Some('"') => '"',
        _ => return Some(Include::Macro),
    };
    let body = &rest[1..];
    let name = body.find(close).map_or(body, |end| &body[..end]);
    Some(Include::Header(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::Engine;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        Engine::builder()
            .rule(IncludeOrder::new())
            .build()
            .expect("engine builds")
            .check_source(code)
            .diagnostics
            .into_iter()
            .filter(|d| d.code == CODE)
            .collect()
    }

    #[test]
    fn test_sorted_run_is_clean() {
        assert!(check_code("#include <stdio.h>\n#include <unistd.h>\n").is_empty());
    }

    #[test]
    fn test_detects_unsorted_pair() {
        let diagnostics = check_code("#include <unistd.h>\n#include <stdio.h>\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 2);
        assert_eq!(diagnostics[0].location.column, 0);
        assert!(diagnostics[0].message.contains("`stdio.h`"));
    }

    #[test]
    fn test_blank_line_restarts_run() {
        let code = "#include <unistd.h>\n\n#include <stdio.h>\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_other_directive_restarts_run() {
        let code = "#include <b.h>\n#define X 1\n#include <a.h>\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_compares_with_immediate_predecessor() {
        let code = "#include <b.h>\n#include <a.h>\n#include <c.h>\n#include <a.h>\n";
        let lines: Vec<usize> = check_code(code).iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_quotes_and_spacing_variants() {
        let code = "  #  include \"zeta.h\"\n#include<alpha.h> // first\n";
        let diagnostics = check_code(code);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 2);
    }

    #[test]
    fn test_macro_include_restarts_run() {
        let code = "#include <z.h>\n#include HEADER\n#include <a.h>\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_comparison_is_bytewise() {
        // Uppercase sorts before lowercase.
        assert!(check_code("#include <Z.h>\n#include <a.h>\n").is_empty());
        assert_eq!(check_code("#include <a.h>\n#include <Z.h>\n").len(), 1);
    }

    #[test]
    fn test_include_inside_block_comment_is_ignored() {
        let code = "#include <b.h>\n/*\n#include <a.h>\n*/\n";
        assert!(check_code(code).is_empty());
    }
}
