//! Usage subcommand: total/used/free space of the filesystems holding the
//! given directories, with a fill-ratio colored bar.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::UsageArgs;
use crate::output;

pub struct UsageCmd {
    dirs: Vec<PathBuf>,
}

impl UsageCmd {
    pub fn new(args: &UsageArgs) -> Self {
        Self {
            dirs: args.dirs.clone(),
        }
    }

    pub fn run(&self) -> Result<()> {
        output::print_user("");
        for dir in &self.dirs {
            print_usage(dir)?;
        }
        Ok(())
    }
}

fn print_usage(dir: &Path) -> Result<()> {
    let total = fs2::total_space(dir)
        .with_context(|| format!("Failed to query disk space of {}", dir.display()))?;
    let free = fs2::available_space(dir)
        .with_context(|| format!("Failed to query disk space of {}", dir.display()))?;
    let used = total.saturating_sub(free);
    let ratio = used as f64 / total.max(1) as f64;

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let resolved = dir
        .canonicalize()
        .unwrap_or_else(|_| dir.to_path_buf());
    output::print_user(&format!(
        "{name}    {}",
        format!("({})", resolved.display()).dimmed()
    ));

    let bar = output::progress_bar(
        (used / 1024) as usize,
        (total / 1024).max(1) as usize,
        "",
    );
    let bar = if ratio > 0.9 {
        bar.red().to_string()
    } else if ratio > 0.7 {
        bar.yellow().to_string()
    } else {
        bar
    };
    output::print_user(&format!(
        "  {bar}   total: {}   used: {}   free: {}",
        output::format_size(total).trim(),
        output::format_size(used).trim(),
        output::format_size(free).trim()
    ));
    Ok(())
}
