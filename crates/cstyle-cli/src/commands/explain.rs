//! Explain command implementation.

use anyhow::{anyhow, Result};
use cstyle_core::Rule;
use cstyle_rules::find_rule;
use std::fmt::Write as _;

/// Runs the explain command.
///
/// # Errors
///
/// Returns an error if `id` names no rule.
pub fn run(id: &str) -> Result<()> {
    let rule = find_rule(id).ok_or_else(|| {
        anyhow!("Unknown rule: {id}. Run `cstyle list-rules` to see the available rules.")
    })?;
    print!("{}", render(rule.as_ref()));
    Ok(())
}

fn render(rule: &dyn Rule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} ({})", rule.code(), rule.name(), rule.default_severity());
    let _ = writeln!(out, "\n{}", rule.description());
    let _ = writeln!(out, "\nConforming code:\n");
    for line in rule.example().lines() {
        let _ = writeln!(out, "    {line}");
    }
    out
}
