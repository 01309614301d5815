//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// File name written by `cstyle init`.
pub const CONFIG_NAME: &str = "cstyle.toml";

const DEFAULT_CONFIG: &str = r#"# cstyle configuration

# Spaces per indentation level
indent_width = 4

[files]
# Extensions checked when walking directories
extensions = ["c", "h", "cc", "cpp", "cxx", "c++", "hpp"]

# Glob patterns to exclude
exclude = [
    "**/build/**",
    "**/third_party/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Rule configurations
# Rules accept their id or code; each can be disabled or escalated

[rules.include-order]
enabled = true
# severity = "error"

[rules.indentation]
enabled = true

# [rules.CS006]
# enabled = false
"#;

/// Runs the init command, writing the default config to `path`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", path.display());
    println!("  2. Run: cstyle check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::{Config, Rule};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses_and_validates() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.indent_width, 4);
        let known = cstyle_rules::all_rules();
        let ids = known.iter().flat_map(|r| [r.name(), r.code()]);
        assert!(config.validate(ids).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_NAME);
        std::fs::write(&path, "indent_width = 2\n").unwrap();

        assert!(run(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "indent_width = 2\n");

        run(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
