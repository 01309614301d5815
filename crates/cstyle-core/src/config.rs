//! Configuration types for cstyle.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default number of columns per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Top-level configuration for cstyle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Columns per indentation level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// File discovery configuration.
    #[serde(default)]
    pub files: FilesConfig,

    /// Per-rule configurations, keyed by rule id or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            files: FilesConfig::default(),
            rules: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks values that TOML cannot express as constraints.
    ///
    /// `known` holds every accepted rule identifier (names and codes).
    ///
    /// # Errors
    ///
    /// Returns an error for a zero indent width or a rule table naming an
    /// unknown rule.
    pub fn validate<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
        if self.indent_width == 0 {
            return Err(ConfigError::InvalidIndentWidth {
                value: self.indent_width,
            });
        }

        let known: Vec<&str> = known.into_iter().collect();
        let mut ids: Vec<&String> = self.rules.keys().collect();
        ids.sort();
        for id in ids {
            if !known.iter().any(|k| k.eq_ignore_ascii_case(id)) {
                return Err(ConfigError::UnknownRule { id: id.clone() });
            }
        }
        Ok(())
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str, rule_code: &str) -> bool {
        self.rule_config(rule_name, rule_code)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str, rule_code: &str) -> Option<crate::Severity> {
        self.rule_config(rule_name, rule_code)
            .and_then(|c| c.severity)
    }

    /// Looks up a rule table by id, falling back to its code.
    ///
    /// Keys match case-insensitively, the same way [`Config::validate`]
    /// accepts them.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str, rule_code: &str) -> Option<&RuleConfig> {
        let lookup = |id: &str| {
            self.rules
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(id))
                .map(|(_, v)| v)
        };
        lookup(rule_name).or_else(|| lookup(rule_code))
    }
}

fn default_indent_width() -> usize {
    DEFAULT_INDENT_WIDTH
}

/// File discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Extensions of files to check, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude from checking.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files checked in parallel.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

impl FilesConfig {
    /// Returns true if `path` carries one of the configured extensions.
    #[must_use]
    pub fn matches_extension(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

fn default_extensions() -> Vec<String> {
    ["c", "h", "cc", "cpp", "cxx", "c++", "hpp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Indent width must be positive.
    #[error("Invalid indent width {value}: must be greater than zero")]
    InvalidIndentWidth {
        /// The rejected value.
        value: usize,
    },

    /// A rule id that no registered rule answers to.
    #[error("Unknown rule: {id}")]
    UnknownRule {
        /// The unrecognized id.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use std::path::Path;

    const KNOWN: [&str; 4] = ["include-order", "CS001", "indentation", "CS007"];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indent_width, 4);
        assert!(config.files.respect_gitignore);
        assert!(config.rules.is_empty());
        assert!(config.validate(KNOWN).is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
indent_width = 2

[files]
exclude = ["**/generated/**"]
parallelism = 3

[rules.include-order]
enabled = false

[rules.CS007]
severity = "error"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.files.exclude, vec!["**/generated/**"]);
        assert_eq!(config.files.parallelism, Some(3));
        assert!(!config.is_rule_enabled("include-order", "CS001"));
        assert!(config.is_rule_enabled("indentation", "CS007"));
        assert_eq!(
            config.rule_severity("indentation", "CS007"),
            Some(Severity::Error)
        );
        assert!(config.validate(KNOWN).is_ok());
    }

    #[test]
    fn zero_indent_width_is_rejected() {
        let config = Config::parse("indent_width = 0").expect("Failed to parse");
        assert!(matches!(
            config.validate(KNOWN),
            Err(ConfigError::InvalidIndentWidth { value: 0 })
        ));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let config = Config::parse("[rules.no-such-rule]\nenabled = true").expect("Failed to parse");
        let err = config.validate(KNOWN).unwrap_err();
        assert_eq!(err.to_string(), "Unknown rule: no-such-rule");
    }

    #[test]
    fn rule_keys_match_regardless_of_case() {
        let config = Config::parse("[rules.Indentation]\nenabled = false\n\n[rules.cs001]\nseverity = \"error\"")
            .expect("Failed to parse");
        assert!(config.validate(KNOWN).is_ok());
        assert!(!config.is_rule_enabled("indentation", "CS007"));
        assert_eq!(
            config.rule_severity("include-order", "CS001"),
            Some(Severity::Error)
        );
    }

    #[test]
    fn bad_severity_is_a_parse_error() {
        let result = Config::parse("[rules.indentation]\nseverity = \"fatal\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn extension_filter() {
        let files = FilesConfig::default();
        assert!(files.matches_extension(Path::new("src/a.c")));
        assert!(files.matches_extension(Path::new("inc/b.HPP")));
        assert!(!files.matches_extension(Path::new("README.md")));
        assert!(!files.matches_extension(Path::new("Makefile")));
    }
}
