//! Delete subcommand: preview, confirm, unlink.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::DeleteArgs;
use crate::output;
use crate::selector::FileSelector;

pub struct DeleteCmd {
    selector: FileSelector,
    skip_preview: bool,
}

impl DeleteCmd {
    pub fn new(args: &DeleteArgs) -> Self {
        Self {
            selector: args.selection.selector(),
            skip_preview: args.skip_preview,
        }
    }

    pub fn run(&self) -> Result<()> {
        let files = self.selector.collect()?;
        if files.is_empty() {
            output::print_user("Nothing to process.");
            return Ok(());
        }

        if !self.skip_preview {
            output::print_user("Preview:");
            delete_files(&files, true)?;
            output::print_rule();
            if !output::confirm("If you want to delete for real, give me a \"yes\" or \"y\" now!")? {
                output::print_user("Will not delete for now. See you soon.");
                return Ok(());
            }
        }
        let deleted = delete_files(&files, false)?;
        info!(deleted, "delete batch finished");
        Ok(())
    }
}

/// Report and (unless dry) unlink each file. Dry runs print the same lines.
fn delete_files(files: &[PathBuf], dry_run: bool) -> Result<usize> {
    for (idx, file) in files.iter().enumerate() {
        output::print_user(&format!(" - deleting {}", file.display()));
        if !dry_run {
            fs::remove_file(file)
                .with_context(|| format!("Failed to delete {}", file.display()))?;
        }
        output::print_user(&output::progress_bar(
            idx + 1,
            files.len(),
            "of files deleted",
        ));
    }
    Ok(files.len())
}
