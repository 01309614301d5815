//! Shared output formatting for check results.

use anyhow::Result;
use cstyle_core::{LintResult, Severity, SourceDiagnostic, SourceFile};
use std::fmt::Write as _;
use std::io::IsTerminal;

use crate::OutputFormat;

/// Print check results in the specified format.
///
/// `sources` must be the files the result was produced from, in the same
/// order; the `pretty` format quotes them.
pub fn print(result: &LintResult, sources: &[SourceFile], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result, std::io::stdout().is_terminal())),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Pretty => print_pretty(result, sources),
    }
    Ok(())
}

fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("{ansi}{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
    }
}

fn render_text(result: &LintResult, color: bool) -> String {
    let mut out = String::new();
    let (errors, warnings) = result.count_by_severity();

    for (path, diagnostic) in result.diagnostics() {
        let severity = paint(
            &diagnostic.severity.to_string(),
            severity_color(diagnostic.severity),
            color,
        );
        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            path.display(),
            diagnostic.location.line,
            diagnostic.location.column + 1,
        );
        let _ = writeln!(out, "  {severity}: {}", diagnostic.message);
        if let Some(suggestion) = &diagnostic.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        severity_color(Severity::Error)
    } else if warnings > 0 {
        severity_color(Severity::Warning)
    } else {
        "\x1b[32m"
    };
    let summary = format!(
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        result.files_checked()
    );
    let _ = writeln!(out, "{}", paint(&summary, summary_color, color));
    out
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for (path, diagnostic) in result.diagnostics() {
        let _ = writeln!(out, "{}:{diagnostic}", path.display());
    }
    out
}

fn print_pretty(result: &LintResult, sources: &[SourceFile]) {
    for (report, source) in result.files.iter().zip(sources) {
        let name = report.path.display().to_string();
        for diagnostic in &report.result.diagnostics {
            let rendered = miette::Report::new(SourceDiagnostic::new(diagnostic, &name, &source.content));
            println!("{rendered:?}");
        }
    }

    let (errors, warnings) = result.count_by_severity();
    println!(
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        result.files_checked()
    );
}
