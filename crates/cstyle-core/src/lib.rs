//! # cstyle-core
//!
//! Core engine for checking the layout of C-family source code without a
//! full C grammar.
//!
//! A file flows one way through the engine:
//!
//! - the [`Scanner`] splits each line into classified [`Span`]s,
//!   carrying open block comments to the next line
//! - [`tokenize`] turns code spans into [`Token`]s
//! - the [`StructuralTracker`] keeps brace/paren depth and the expected
//!   indentation
//! - every [`Rule`] inspects the resulting [`LineContext`]
//! - the [`DiagnosticCollector`] returns the findings sorted as a
//!   [`CheckResult`]
//!
//! ## Example
//!
//! ```ignore
//! use cstyle_core::Engine;
//! use cstyle_rules::all_rules;
//!
//! let engine = Engine::builder().rules(all_rules()).build()?;
//! let result = engine.check_source("int x = 1+2;\n");
//! assert!(!result.is_clean());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collector;
mod config;
mod context;
mod engine;
mod rule;
mod scanner;
mod token;
mod tracker;
mod types;

/// Engine-level diagnostics for malformed input.
pub mod malformed;

pub use collector::DiagnosticCollector;
pub use config::{Config, ConfigError, FilesConfig, RuleConfig, DEFAULT_INDENT_WIDTH};
pub use context::{LineContext, LineIndent, LineKind};
pub use engine::{Engine, EngineBuilder, EngineError, SourceFile};
pub use rule::{LineCheck, Rule, RuleBox};
pub use scanner::{ScannedLine, Scanner, Span, SpanKind, UnterminatedLiteral};
pub use token::{tokenize, Token, TokenKind, KEYWORDS};
pub use tracker::{IndentExpectation, IndentFrame, LineObservation, ScanState, StructuralTracker};
pub use types::{
    offset_for, CheckResult, Diagnostic, FileReport, LintResult, Location, Severity,
    SourceDiagnostic, Suggestion,
};
