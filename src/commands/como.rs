//! Copy/move subcommand: selection, conflict policy, transfer.

use anyhow::Result;

use crate::cli::TransferArgs;
use crate::fs_ops::como::{transfer, ConflictPolicy, TransferMode, TransferRequest};
use crate::output;
use crate::selector::FileSelector;

pub struct ComoCmd {
    selector: FileSelector,
    request: TransferRequest,
}

impl ComoCmd {
    /// Policy exclusivity is checked here, before any file is read.
    pub fn new(args: &TransferArgs, mode: TransferMode) -> Result<Self> {
        let policy = ConflictPolicy::from_flags(args.skip_existing, args.keep_all)?;
        Ok(Self {
            selector: args.selection.selector(),
            request: TransferRequest {
                dir_source: args.selection.dir_source.clone(),
                dir_dest: args.dir_dest.clone(),
                mode,
                policy,
                flatten: args.flatten,
                dry_run: args.dryrun,
            },
        })
    }

    pub fn run(&self) -> Result<()> {
        let files = self.selector.collect()?;
        if files.is_empty() {
            output::print_user("Nothing to process.");
            return Ok(());
        }

        if self.request.dry_run {
            output::print_info("Dry run: nothing will be touched.");
        }
        let counts = transfer(&self.request, &files)?;
        let done = match self.request.mode {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        };
        output::print_user(&format!(
            "{done} {} of {} files ({} skipped, {} replaced, {} renamed).",
            counts.transferred, counts.selected, counts.skipped, counts.replaced, counts.renamed
        ));
        Ok(())
    }
}
