//! Application orchestrator.
//! Initializes logging and dispatches the parsed subcommand to its handler.

use anyhow::Result;
use tracing::debug;

use filekit::cli::{Cli, Command};
use filekit::commands::{BackupCmd, ComoCmd, DeleteCmd, RenameCmd, TreeCmd, UsageCmd};
use filekit::fs_ops::TransferMode;
use filekit::output as out;

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;
    debug!(command = ?cli.command, "starting filekit");

    let result = match &cli.command {
        Command::Rename(args) => RenameCmd::new(args)?.run(),
        Command::Copy(args) => ComoCmd::new(args, TransferMode::Copy)?.run(),
        Command::Move(args) => ComoCmd::new(args, TransferMode::Move)?.run(),
        Command::Delete(args) => DeleteCmd::new(args).run(),
        Command::Backup(args) => BackupCmd::new(args)?.run(),
        Command::Tree(args) => TreeCmd::new(args).run(),
        Command::Usage(args) => UsageCmd::new(args).run(),
    };

    if let Err(e) = &result {
        out::print_error(&format!("{e:#}"));
    }
    result
}
