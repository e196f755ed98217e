//! Tree subcommand: draw a directory tree with rolled-up sizes.
//!
//! Unreadable subdirectories are marked and excluded from the rollup; a
//! rolled-up size that misses such a subtree is printed with a trailing `+`
//! (a potential undercount, not an error).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::warn;

use crate::cli::TreeArgs;
use crate::output;

const ELBOW: &str = "\u{2514}\u{2500}\u{2500}";
const TEE: &str = "\u{251c}\u{2500}\u{2500}";
const PIPE_PREFIX: &str = "\u{2502}   ";
const SPACE_PREFIX: &str = "    ";

pub struct TreeCmd {
    root: PathBuf,
    dirs_only: bool,
}

/// Size of a subtree and whether any part of it could not be read.
#[derive(Debug, Clone, Copy, Default)]
struct Rollup {
    bytes: u64,
    undercount: bool,
}

impl TreeCmd {
    pub fn new(args: &TreeArgs) -> Self {
        Self {
            root: args.root_dir.clone(),
            dirs_only: args.dirs_only,
        }
    }

    pub fn run(&self) -> Result<()> {
        let mut lines = Vec::new();
        self.add_directory(&self.root, "", "", &mut lines);
        for line in lines {
            output::print_user(&line);
        }
        Ok(())
    }

    /// Render `dir` and its children, returning the rolled-up size. The
    /// directory's own line is patched once the size is known.
    fn add_directory(
        &self,
        dir: &Path,
        prefix: &str,
        connector: &str,
        lines: &mut Vec<String>,
    ) -> Rollup {
        let idx_dir = lines.len();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        lines.push(format!("{prefix}{connector}{}", format!("{name}/").yellow()));

        let child_prefix = match connector {
            "" => prefix.to_string(),
            TEE => format!("{prefix}{PIPE_PREFIX}"),
            _ => format!("{prefix}{SPACE_PREFIX}"),
        };

        let mut rollup = Rollup::default();
        let entries = match read_sorted(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read directory");
                lines[idx_dir].push_str(&format!(" {}", "[access denied]".red()));
                rollup.undercount = true;
                return rollup;
            }
        };

        let count = entries.len();
        for (index, entry) in entries.iter().enumerate() {
            let connector = if index == count - 1 { ELBOW } else { TEE };
            if entry.is_dir() {
                let child = self.add_directory(entry, &child_prefix, connector, lines);
                rollup.bytes += child.bytes;
                rollup.undercount |= child.undercount;
            } else {
                rollup.bytes += self.add_file(entry, &child_prefix, connector, lines);
            }
        }

        let marker = if rollup.undercount { "+" } else { "" };
        let size_note = format!(
            "{SPACE_PREFIX}size: {}{marker}",
            output::format_size(rollup.bytes).trim()
        );
        lines[idx_dir].push_str(&format!("{}", size_note.cyan()));
        lines.push(child_prefix.trim_end().to_string());
        rollup
    }

    fn add_file(&self, file: &Path, prefix: &str, connector: &str, lines: &mut Vec<String>) -> u64 {
        let bytes = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        if !self.dirs_only {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!(
                "{prefix}{connector} {name}{SPACE_PREFIX}{}",
                format!("size: {}", output::format_size(bytes).trim()).cyan()
            ));
        }
        bytes
    }
}

/// Directory entries, files before subdirectories, each group name-sorted.
fn read_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort_by_key(|p| (p.is_dir(), p.file_name().map(|n| n.to_os_string())));
    Ok(entries)
}
