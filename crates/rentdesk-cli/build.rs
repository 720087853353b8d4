//! Build script that stamps the binary with a git-derived version.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let package = env!("CARGO_PKG_VERSION");
    let version = match git(&["describe", "--tags", "--always", "--dirty"]) {
        Some(described) if described.starts_with('v') => described[1..].to_string(),
        Some(described) if !described.contains('.') => format!("{} ({})", package, described),
        Some(described) => described,
        None => package.to_string(),
    };

    println!("cargo:rustc-env=RENTDESK_VERSION={}", version);
}

/// Run git and return its trimmed stdout, if it succeeded with output.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let trimmed = stdout.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
