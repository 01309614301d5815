//! Subcommand implementations.

pub mod check;
pub mod explain;
pub mod init;
pub mod list_rules;
pub mod output;
