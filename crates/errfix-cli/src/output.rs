//! Terminal reporting
//!
//! Diffs and status lines go to stdout, warnings and errors to stderr.

use colored::*;
use std::path::Path;

const REMINDER: &str =
    "Please verify modified files and add files by running `git add .` to approve modified files.";

/// Prints run progress with `colored` styling
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Status line plus review diff for a file whose text changed
    pub fn file_changed(&self, path: &Path, diff: &str) {
        println!(
            "{}",
            format!("Fixing error numbers: [{}]", path.display()).yellow()
        );
        for line in diff.lines() {
            println!("{}", paint_diff_line(line));
        }
        println!();
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}: {}", "warning".yellow().bold(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}: {}", "error".red().bold(), message);
    }

    /// Closing note after files were written
    pub fn reminder(&self) {
        println!("{}", REMINDER.yellow());
    }
}

fn paint_diff_line(line: &str) -> ColoredString {
    if line.starts_with("---") || line.starts_with("+++") {
        line.bold()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('-') {
        line.red()
    } else if line.starts_with('+') {
        line.green()
    } else {
        line.normal()
    }
}
