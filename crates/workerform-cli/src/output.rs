use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use workerform_provider::DiffResult;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// One-line human summary of a diff, printed before the JSON.
pub fn describe_diff(diff: &DiffResult) -> String {
    if !diff.changes {
        "no changes".to_string()
    } else if diff.requires_replace() {
        format!("replace (changed: {})", diff.replaces.join(", "))
    } else {
        "update in place".to_string()
    }
}
