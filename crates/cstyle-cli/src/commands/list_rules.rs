//! List rules command implementation.

use cstyle_core::{malformed, Rule};
use cstyle_rules::{all_rules, layout_rules};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<30} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<30} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nAlways on (malformed input, reported as errors):");
    for (code, id) in malformed::ALL {
        println!("{code:<10} {id}");
    }

    let layout: Vec<&str> = layout_rules().iter().map(|r| r.code()).collect();
    println!("\nPresets:");
    println!("  all     - every rule (default)");
    println!("  layout  - {} (for gradual adoption)", layout.join(", "));

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cstyle check --rules include-order,indentation");
    println!("  cstyle check --rules CS001,CS007");
    println!("\nUse `cstyle explain <rule>` for details and an example.");
}
