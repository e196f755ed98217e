//! CLI definition and parsing.
//! One subcommand per batch tool; the shared selection flags live in
//! [`SelectionArgs`] and are flattened into every file-driven subcommand.

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::selector::{FileSelector, FilterList};

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Batch file-system maintenance from the command line"
)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rename files by regex substitution, with collision-safe numbering.
    Rename(RenameArgs),
    /// Copy files into a destination directory.
    Copy(TransferArgs),
    /// Move files into a destination directory.
    Move(TransferArgs),
    /// Delete files after a preview and confirmation.
    Delete(DeleteArgs),
    /// Mirror directories into backup locations.
    Backup(BackupArgs),
    /// Print a directory tree with rolled-up sizes.
    Tree(TreeArgs),
    /// Report disk usage for one or more directories.
    Usage(UsageArgs),
}

/// File-selection flags shared by rename/copy/move/delete.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Directory holding the files to process.
    #[arg(value_name = "DIR_SOURCE", value_hint = ValueHint::DirPath)]
    pub dir_source: PathBuf,

    /// Search recursively in the source directory.
    #[arg(short, long)]
    pub recursive: bool,

    /// Substring identifying files to process (case-insensitive).
    #[arg(long)]
    pub filterstring: Option<String>,

    /// Text or CSV file listing the file names to process.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub filterlist: Option<PathBuf>,

    /// Column header to read from a CSV filter list. Without a header every
    /// line of the file is treated as one file name.
    #[arg(long)]
    pub filterlistheader: Option<String>,

    /// Separator of the CSV filter list.
    #[arg(long, default_value = ",")]
    pub filterlistsep: String,
}

impl SelectionArgs {
    /// Build the selection service this command will own.
    pub fn selector(&self) -> FileSelector {
        FileSelector {
            dir_source: self.dir_source.clone(),
            recursive: self.recursive,
            filterstring: self.filterstring.clone(),
            filterlist: self.filterlist.clone().map(|path| {
                FilterList::new(
                    path,
                    self.filterlistheader.clone(),
                    self.filterlistsep.clone(),
                )
            }),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Pattern identifying the substring to replace (regex crate syntax).
    #[arg(long = "re-pattern", default_value = ".*")]
    pub re_pattern: String,

    /// Replacement string. Use $1, $2 or ${name} to refer to capture groups;
    /// a pattern like '(.+)\.(.+)' with '${1}_suffix.${2}' appends suffixes.
    #[arg(short, long, default_value = "")]
    pub substitute: String,

    /// Skip the preview and confirmation and rename directly.
    /// Only for the brave.
    #[arg(long)]
    pub skip_preview: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Directory to copy/move files into.
    #[arg(value_name = "DIR_DEST", value_hint = ValueHint::DirPath)]
    pub dir_dest: PathBuf,

    /// Do nothing for files that already exist in the destination
    /// (instead of replacing them).
    #[arg(long)]
    pub skip_existing: bool,

    /// Keep both versions when a file already exists in the destination
    /// (instead of replacing it).
    #[arg(long)]
    pub keep_all: bool,

    /// Flatten the folder structure in the destination when running
    /// recursively. Same-named files from different subfolders collide.
    #[arg(long)]
    pub flatten: bool,

    /// Report what would happen without touching anything.
    #[arg(long)]
    pub dryrun: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Skip the preview and confirmation and delete directly.
    /// Only for the brave.
    #[arg(long)]
    pub skip_preview: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BackupArgs {
    /// Source directory to back up.
    #[arg(short = 's', long, value_hint = ValueHint::DirPath)]
    pub dir_source: Option<PathBuf>,

    /// Destination directory for the backup.
    #[arg(short = 'd', long, value_hint = ValueHint::DirPath)]
    pub dir_dest: Option<PathBuf>,

    /// CSV file of source,dest directory pairs (header row skipped).
    /// Mutually exclusive with --dir-source/--dir-dest.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub cfg_file: Option<PathBuf>,

    /// Delete destination files that no longer exist at the source.
    #[arg(long)]
    pub delete: bool,

    /// Report what would happen without touching anything.
    #[arg(long)]
    pub dryrun: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Root directory to draw the tree from.
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    pub root_dir: PathBuf,

    /// Show directories only.
    #[arg(long)]
    pub dirs_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UsageArgs {
    /// Directory or directories to get info on.
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    pub dirs: Vec<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
