//! Colored console output for the user-facing run summaries.
//!
//! Diagnostics go through `tracing`; these helpers print what the user asked to see.

use biorun_core::core::io::artifacts::Preview;
use colored::*;
use std::fmt::Display;

const RULE_WIDTH: usize = 50;

pub fn banner(title: &str) {
    println!("{}", title.blue().bold());
    println!("{}", "=".repeat(RULE_WIDTH).blue());
}

pub fn info(label: &str, value: impl Display) {
    println!("{}", format_info(label, value));
}

pub fn success(message: impl Display) {
    println!("{}", format_success(message));
}

pub fn warning(message: impl Display) {
    eprintln!("{}", format_warning(message));
}

pub fn error(message: impl Display) {
    eprintln!("{}", format_error(message));
}

/// Prints a captured stream of a failed tool run, if it has any content.
pub fn captured(label: &str, content: &str) {
    let content = content.trim_end();
    if content.is_empty() {
        return;
    }
    eprintln!("{}", format!("{}:", label).red().bold());
    eprintln!("{}", content);
}

pub fn preview(heading: &str, preview: &Preview) {
    if preview.is_empty() {
        return;
    }
    println!("{}", format!("{} ({}):", heading, preview.total).white().bold());
    for line in format_preview(preview) {
        println!("{}", line.dimmed());
    }
}

pub fn format_info(label: &str, value: impl Display) -> String {
    format!("{} {}", format!("{}:", label).blue().bold(), value)
}

pub fn format_success(message: impl Display) -> String {
    format!("{} {}", "✓".green().bold(), message.to_string().green())
}

pub fn format_warning(message: impl Display) -> String {
    format!("{} {}", "Warning:".yellow().bold(), message.to_string().yellow())
}

pub fn format_error(message: impl Display) -> String {
    format!("{} {}", "Error:".red().bold(), message.to_string().red())
}

pub fn format_preview(preview: &Preview) -> Vec<String> {
    let mut lines: Vec<String> = preview.shown.iter().map(|name| format!("  - {}", name)).collect();
    if preview.remaining > 0 {
        lines.push(format!("  ... and {} more", preview.remaining));
    }
    lines
}
