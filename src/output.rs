//! Small wrapper around stdout/stderr printing to provide consistent, colored
//! user-facing messages. Colors are enabled only when output is a TTY.

use owo_colors::OwoColorize;
use std::io::{self, BufRead};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// such as preview listings which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Horizontal rule separating preview sections.
pub fn print_rule() {
    println!("{}", "\u{2014}".repeat(50));
}

/// Render a fixed-width progress bar: `|████████------------|  40.0% suffix`.
pub fn progress_bar(done: usize, total: usize, suffix: &str) -> String {
    const BAR_LEN: usize = 20;
    let total = total.max(1);
    let filled = (BAR_LEN * done / total).min(BAR_LEN);
    let percents = 100.0 * done as f64 / total as f64;
    format!(
        "|{}{}| {:5.1}% {}",
        "\u{2588}".repeat(filled),
        "-".repeat(BAR_LEN - filled),
        percents,
        suffix
    )
}

/// Human-readable byte count. Directory sizes are reported in MB and up,
/// which is the granularity the tree/usage views care about.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB.powi(5) {
        format!("{:6.2} PB", b / KIB.powi(5))
    } else if b >= KIB.powi(4) {
        format!("{:6.2} TB", b / KIB.powi(4))
    } else if b >= KIB.powi(3) {
        format!("{:6.2} GB", b / KIB.powi(3))
    } else {
        format!("{:6.2} MB", b / KIB.powi(2))
    }
}

/// Ask for confirmation on stdin. Only a case-insensitive `yes` or `y`
/// proceeds; anything else (including EOF) declines.
pub fn confirm(message: &str) -> io::Result<bool> {
    print_user(message);
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let choice = line.trim().to_ascii_lowercase();
    Ok(matches!(choice.as_str(), "y" | "yes"))
}
