//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use rentdesk_core::ActionOutcome;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a dimmed hint on stderr.
pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print each outcome; returns how many failed.
pub fn outcomes(outcomes: &[ActionOutcome]) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        if outcome.is_success() {
            success(&outcome.to_string());
        } else {
            failed += 1;
            error(&outcome.to_string());
        }
    }
    failed
}
