//! Rule traits for defining style rules.

use crate::context::LineContext;
use crate::types::{Diagnostic, Severity};

/// A style rule.
///
/// A `Rule` is the shareable description of a check. For every file the
/// engine asks it for a fresh [`LineCheck`], which is fed the lines of that
/// file in order. Any look-behind a rule needs (include runs, a pending
/// template header) lives in its `LineCheck` and dies with the file.
///
/// # Example
///
/// ```ignore
/// use cstyle_core::{Diagnostic, LineCheck, LineContext, Rule, Severity};
///
/// pub struct NoTabs;
///
/// impl Rule for NoTabs {
///     fn name(&self) -> &'static str { "no-tabs" }
///     fn code(&self) -> &'static str { "CS900" }
///     fn checker(&self) -> Box<dyn LineCheck> { Box::new(NoTabs) }
/// }
///
/// impl LineCheck for NoTabs {
///     fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic> {
///         line.text
///             .find('\t')
///             .map(|column| {
///                 Diagnostic::new("CS900", "no-tabs", Severity::Warning,
///                     line.location(column), "tab character")
///             })
///             .into_iter()
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case id of this rule (e.g., "include-order").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns a short snippet of conforming code.
    fn example(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Returns true if `id` names this rule by id or code.
    fn matches_id(&self, id: &str) -> bool {
        self.name().eq_ignore_ascii_case(id) || self.code().eq_ignore_ascii_case(id)
    }

    /// Creates the per-file checker for this rule.
    fn checker(&self) -> Box<dyn LineCheck>;
}

/// Per-file state of a rule.
pub trait LineCheck {
    /// Checks one line and returns any diagnostics found.
    ///
    /// Called for every line of the file, blank lines included, in order.
    fn check_line(&mut self, line: &LineContext<'_>) -> Vec<Diagnostic>;

    /// Called once after the last line.
    fn finish(&mut self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn checker(&self) -> Box<dyn LineCheck> {
            Box::new(CountLines(0))
        }
    }

    struct CountLines(usize);

    impl LineCheck for CountLines {
        fn check_line(&mut self, _line: &LineContext<'_>) -> Vec<Diagnostic> {
            self.0 += 1;
            Vec::new()
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert!(rule.example().is_empty());
    }

    #[test]
    fn matches_name_or_code() {
        let rule = TestRule;
        assert!(rule.matches_id("test-rule"));
        assert!(rule.matches_id("test001"));
        assert!(rule.matches_id("Test-Rule"));
        assert!(!rule.matches_id("other"));
    }
}
