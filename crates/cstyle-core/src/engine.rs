//! Engine driver: runs the scanner, the tracker and every rule over a file.

use crate::collector::DiagnosticCollector;
use crate::config::{Config, ConfigError};
use crate::context::{LineContext, LineKind};
use crate::malformed;
use crate::rule::{LineCheck, Rule, RuleBox};
use crate::scanner::{Scanner, SpanKind};
use crate::token::tokenize;
use crate::tracker::StructuralTracker;
use crate::types::{CheckResult, FileReport, LintResult, Location, Severity};

use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while setting up or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected before any file was checked.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One file's already-decoded content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path used in reports.
    pub path: PathBuf,
    /// File content.
    pub content: String,
}

impl SourceFile {
    /// Creates a new source file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    only: Option<Vec<String>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the engine.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the engine.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Restricts the run to the given rule ids or codes.
    #[must_use]
    pub fn only<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or names a rule
    /// that was not registered.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config.unwrap_or_default();
        let known: Vec<&str> = self
            .rules
            .iter()
            .flat_map(|r| [r.name(), r.code()])
            .collect();
        config.validate(known.iter().copied())?;

        if let Some(only) = &self.only {
            if let Some(unknown) = only
                .iter()
                .find(|id| !self.rules.iter().any(|r| r.matches_id(id)))
            {
                return Err(ConfigError::UnknownRule {
                    id: unknown.clone(),
                }
                .into());
            }
        }

        let mut rules = Vec::new();
        for rule in self.rules {
            if !config.is_rule_enabled(rule.name(), rule.code()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            if let Some(only) = &self.only {
                if !only.iter().any(|id| rule.matches_id(id)) {
                    debug!("Skipping unselected rule: {}", rule.name());
                    continue;
                }
            }
            let severity = config
                .rule_severity(rule.name(), rule.code())
                .unwrap_or_else(|| rule.default_severity());
            rules.push(ActiveRule { rule, severity });
        }

        Ok(Engine {
            rules,
            indent_width: config.indent_width,
            parallelism: config.files.parallelism,
        })
    }
}

struct ActiveRule {
    rule: RuleBox,
    severity: Severity,
}

/// Checks files against the registered rules.
///
/// Use [`Engine::builder()`] to construct an instance. Checking a file is a
/// pure function of its text and the configuration; nothing is shared
/// between files.
pub struct Engine {
    rules: Vec<ActiveRule>,
    indent_width: usize,
    parallelism: Option<usize>,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configured indent width.
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Returns the ids of the active rules, in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.rule.name())
    }

    /// Checks one file given as a sequence of lines.
    pub fn check<'a, I>(&self, lines: I) -> CheckResult
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scanner = Scanner::new();
        let mut tracker = StructuralTracker::new(self.indent_width);
        let mut collector = DiagnosticCollector::new();
        let mut checkers: Vec<(Box<dyn LineCheck>, Severity)> = self
            .rules
            .iter()
            .map(|r| (r.rule.checker(), r.severity))
            .collect();

        let mut open_comment: Option<Location> = None;
        let mut last_line = 0;

        for (idx, text) in lines.into_iter().enumerate() {
            let number = idx + 1;
            last_line = number;

            let starts_in_comment = scanner.in_block_comment();
            let scanned = scanner.scan_line(text);
            if let Some(literal) = scanned.unterminated {
                collector.push(malformed::unterminated_literal(number, literal));
            }

            if scanner.in_block_comment() {
                let reopened = scanned.spans.last().filter(|s| {
                    s.kind == SpanKind::BlockComment && !(starts_in_comment && s.start == 0)
                });
                match reopened {
                    Some(span) => open_comment = Some(Location::new(number, span.start)),
                    None if !starts_in_comment => open_comment = Some(Location::new(number, 0)),
                    None => {}
                }
            } else {
                open_comment = None;
            }

            let tokens = tokenize(text, &scanned.spans);
            let kind = LineKind::classify(text, &scanned.spans, &tokens, starts_in_comment);
            let observed = tracker.observe(number, text, kind, &tokens, starts_in_comment);
            collector.extend(observed.diagnostics);

            let line = LineContext {
                number,
                text,
                kind,
                spans: &scanned.spans,
                tokens: &tokens,
                state: &observed.state,
                indent: &observed.indent,
            };
            for (checker, severity) in &mut checkers {
                let severity = *severity;
                collector.extend(checker.check_line(&line).into_iter().map(|mut d| {
                    d.severity = severity;
                    d
                }));
            }
        }

        for (checker, severity) in &mut checkers {
            let severity = *severity;
            collector.extend(checker.finish().into_iter().map(|mut d| {
                d.severity = severity;
                d
            }));
        }

        if let Some(location) = open_comment {
            collector.push(malformed::unterminated_comment(location));
        }
        let depth = tracker.state().brace_depth;
        if depth > 0 {
            collector.push(malformed::unclosed_brace(last_line, depth));
        }

        collector.finalize()
    }

    /// Checks one file given as a single string.
    #[must_use]
    pub fn check_source(&self, source: &str) -> CheckResult {
        self.check(source.lines())
    }

    /// Checks many files in parallel.
    ///
    /// Reports come back in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if a bounded worker pool could not be created.
    pub fn check_sources(&self, files: &[SourceFile]) -> Result<LintResult, EngineError> {
        info!("Checking {} files with {} rules", files.len(), self.rules.len());

        let run = || -> Vec<FileReport> {
            files
                .par_iter()
                .map(|file| {
                    debug!("Checking: {}", file.path.display());
                    let result = self.check_source(&file.content);
                    debug!(
                        "Finished {}: {} diagnostics",
                        file.path.display(),
                        result.diagnostics.len()
                    );
                    FileReport {
                        path: file.path.clone(),
                        result,
                    }
                })
                .collect()
        };

        let files = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let result = LintResult { files };
        let (errors, warnings) = result.count_by_severity();
        info!(
            "Check complete: {} error(s), {} warning(s) in {} files",
            errors,
            warnings,
            result.files_checked()
        );
        Ok(result)
    }
}
