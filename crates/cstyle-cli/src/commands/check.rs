//! Check command implementation.

use anyhow::{Context, Result};
use clap::Args;
use cstyle_core::{Engine, FileReport, LintResult, Rule, SourceFile};
use cstyle_rules::{all_rules, Preset};
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::diff_filter::ChangedLines;
use crate::discovery;
use crate::OutputFormat;

/// Arguments of `cstyle check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only run specific rules (comma-separated ids or codes)
    #[arg(long)]
    pub rules: Option<String>,

    /// Rule preset: `all` or `layout` (ignored when --rules is given)
    #[arg(long, default_value = "all", value_parser = parse_preset)]
    pub preset: Preset,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Spaces per indentation level, overriding the config file
    #[arg(long)]
    pub indent_width: Option<usize>,

    /// Only report lines added or changed by this unified diff
    #[arg(long, value_name = "FILE")]
    pub diff: Option<PathBuf>,
}

fn parse_preset(name: &str) -> Result<Preset, String> {
    Preset::from_name(name).ok_or_else(|| format!("unknown preset `{name}` (expected `all` or `layout`)"))
}

/// Runs the check command. Returns `Ok(true)` when every file is clean.
///
/// # Errors
///
/// Returns an error for invalid configuration, unknown rules, missing
/// paths and unreadable files.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<bool> {
    let source = config_resolver::resolve(&args.paths, explicit_config);
    tracing::debug!("Config source: {:?}", source);
    let mut config = source.load()?;

    if let Some(width) = args.indent_width {
        config.indent_width = width;
    }
    config.files.exclude.extend(args.exclude.iter().cloned());
    let files = config.files.clone();

    // Rejected configuration stops the run before any file is read.
    let engine = Engine::builder()
        .rules(all_rules())
        .config(config)
        .only(selected_rules(args))
        .build()
        .context("Invalid configuration")?;

    let changed = args
        .diff
        .as_deref()
        .map(|path| ChangedLines::from_file(path, &files))
        .transpose()?;

    let mut paths = discovery::discover(&args.paths, &files)?;
    if let Some(changed) = &changed {
        if changed.is_empty() {
            tracing::warn!("The diff touches no checked files");
        }
        tracing::debug!("Diff files: {:?}", changed.files().collect::<Vec<_>>());
        paths.retain(|path| changed.ranges_for(path).is_some());
        tracing::debug!("{} file(s) touched by the diff", paths.len());
    }

    let sources = paths
        .iter()
        .map(|path| read_source(path))
        .collect::<Result<Vec<_>>>()?;

    let mut result = engine.check_sources(&sources).context("Check failed")?;
    if let Some(changed) = &changed {
        result = restrict_to_diff(result, changed);
    }

    super::output::print(&result, &sources, args.format)?;

    Ok(result.is_clean())
}

/// Rule ids named by `--rules`, else the ids of the chosen preset.
fn selected_rules(args: &CheckArgs) -> Vec<String> {
    match &args.rules {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
        None => args
            .preset
            .rules()
            .iter()
            .map(|rule| rule.name().to_string())
            .collect(),
    }
}

fn read_source(path: &Path) -> Result<SourceFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile::new(path, String::from_utf8_lossy(&bytes)))
}

fn restrict_to_diff(result: LintResult, changed: &ChangedLines) -> LintResult {
    LintResult {
        files: result
            .files
            .into_iter()
            .map(|report| FileReport {
                result: changed.restrict(&report.path, report.result),
                path: report.path,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            format: OutputFormat::Json,
            rules: None,
            preset: Preset::All,
            exclude: Vec::new(),
            indent_width: None,
            diff: None,
        }
    }

    #[test]
    fn clean_tree_passes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ok.c"), "int main()\n{\n    return 0;\n}\n").unwrap();

        assert!(run(&args(vec![tmp.path().to_path_buf()]), None).unwrap());
    }

    #[test]
    fn violations_fail_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.c"), "int x = 1+2;\n").unwrap();

        assert!(!run(&args(vec![tmp.path().to_path_buf()]), None).unwrap());
    }

    #[test]
    fn rules_flag_narrows_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.c"), "int x = 1+2;\n").unwrap();

        let mut only_layout = args(vec![tmp.path().to_path_buf()]);
        only_layout.rules = Some("CS002, indentation".to_string());
        assert!(run(&only_layout, None).unwrap());
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut bad = args(vec![tmp.path().to_path_buf()]);
        bad.rules = Some("no-such-rule".to_string());

        let err = run(&bad, None).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown rule: no-such-rule"));
    }

    #[test]
    fn bad_rules_win_over_unreadable_paths() {
        let tmp = TempDir::new().unwrap();
        let mut bad = args(vec![tmp.path().join("missing")]);
        bad.rules = Some("no-such-rule".to_string());

        let err = run(&bad, None).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown rule: no-such-rule"));
    }

    #[test]
    fn zero_indent_width_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut bad = args(vec![tmp.path().to_path_buf()]);
        bad.indent_width = Some(0);

        assert!(run(&bad, None).is_err());
    }

    #[test]
    fn project_config_is_honored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.c"), "int x = 1+2;\n").unwrap();
        fs::write(
            tmp.path().join("cstyle.toml"),
            "[rules.binary-operator-spacing]\nenabled = false\n",
        )
        .unwrap();

        assert!(run(&args(vec![tmp.path().to_path_buf()]), None).unwrap());
    }

    #[test]
    fn diff_limits_report_to_changed_lines() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.c"), "int x = 1+2;\nint y = 3;\n").unwrap();
        fs::write(src.join("b.c"), "int z = 4+5;\n").unwrap();

        let diff = tmp.path().join("change.diff");
        fs::write(
            &diff,
            "--- a/src/a.c\n+++ b/src/a.c\n@@ -2,0 +2,1 @@\n+int y = 3;\n",
        )
        .unwrap();

        let mut scoped = args(vec![tmp.path().to_path_buf()]);
        scoped.diff = Some(diff);
        assert!(run(&scoped, None).unwrap());
    }

    #[test]
    fn lossy_decoding_keeps_checking() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("latin1.c");
        fs::write(&file, b"/* caf\xe9 */\nint x = 1;\n").unwrap();

        let source = read_source(&file).unwrap();
        assert!(source.content.contains('\u{fffd}'));
    }
}
