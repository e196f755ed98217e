//! Backup subcommand: mirror one or more source/destination directory pairs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::BackupArgs;
use crate::errors::FilekitError;
use crate::fs_ops::backup::{conditional_copy, conditional_delete, list_filedirs};
use crate::output;

#[derive(Debug, Clone)]
pub struct DirPair {
    pub source: PathBuf,
    pub dest: PathBuf,
}

pub struct BackupCmd {
    pairs: Vec<DirPair>,
    delete: bool,
    dry_run: bool,
}

impl BackupCmd {
    pub fn new(args: &BackupArgs) -> Result<Self> {
        if args.cfg_file.is_some() && (args.dir_source.is_some() || args.dir_dest.is_some()) {
            return Err(FilekitError::ConflictingBackupSources.into());
        }

        let pairs = match &args.cfg_file {
            Some(cfg) => read_pair_file(cfg)?,
            None => {
                let source = args
                    .dir_source
                    .clone()
                    .context("backup needs --dir-source (or --cfg-file)")?;
                let dest = args
                    .dir_dest
                    .clone()
                    .context("backup needs --dir-dest (or --cfg-file)")?;
                vec![DirPair { source, dest }]
            }
        };

        Ok(Self {
            pairs,
            delete: args.delete,
            dry_run: args.dryrun,
        })
    }

    pub fn run(&self) -> Result<()> {
        let start = Instant::now();
        if self.dry_run {
            output::print_info("Dry run: nothing will be touched.");
        }
        for pair in &self.pairs {
            backup_dir(&pair.source, &pair.dest, self.delete, self.dry_run)?;
        }
        let minutes = start.elapsed().as_secs_f64() / 60.0;
        output::print_user(&format!(
            "Hurray! All files backed up in only {minutes:5.2} minutes."
        ));
        Ok(())
    }
}

/// One `source,dest` pair per line; the header row is skipped.
fn read_pair_file(path: &Path) -> Result<Vec<DirPair>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pair file {}", path.display()))?;
    let mut pairs = Vec::new();
    for line in content.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, ',');
        let source = fields.next().unwrap_or_default().trim();
        let dest = fields
            .next()
            .with_context(|| format!("Pair file line without a destination: '{line}'"))?
            .trim();
        pairs.push(DirPair {
            source: PathBuf::from(source),
            dest: PathBuf::from(dest),
        });
    }
    Ok(pairs)
}

fn backup_dir(dir_source: &Path, dir_dest: &Path, delete: bool, dry_run: bool) -> Result<()> {
    output::print_user(&format!(
        "Backing up files in {} to {}.",
        dir_source.display(),
        dir_dest.display()
    ));

    let (files_source, dirs_source) = list_filedirs(dir_source)?;
    let num_checked = files_source.len();
    let mut num_copied = 0usize;

    for (idx, file) in files_source.iter().enumerate() {
        let rel = file.strip_prefix(dir_source).with_context(|| {
            format!(
                "Source {} is not under {}",
                file.display(),
                dir_source.display()
            )
        })?;
        let dest = dir_dest.join(rel);
        if let Some(action) = conditional_copy(file, &dest, dry_run)? {
            output::print_user(&format!(" - {} {}", action.verb(), file.display()));
            num_copied += 1;
        }
        output::print_user(&output::progress_bar(idx + 1, num_checked, "of files checked"));
    }

    let mut num_deleted = 0usize;
    if delete {
        output::print_user("All files stored, checking for files to delete now.");
        let (files_dest, dirs_dest) = list_filedirs(dir_dest)?;
        let source_files: HashSet<PathBuf> = files_source.iter().cloned().collect();
        let source_dirs: HashSet<PathBuf> = dirs_source.iter().cloned().collect();

        for (idx, dest_file) in files_dest.iter().enumerate() {
            let rel = dest_file.strip_prefix(dir_dest)?;
            let counterpart = dir_source.join(rel);
            if conditional_delete(&counterpart, dest_file, &source_files, dry_run)? {
                output::print_user(&format!(" - deleting {}", dest_file.display()));
                num_deleted += 1;
            }
            output::print_user(&output::progress_bar(
                idx + 1,
                files_dest.len(),
                "of files checked",
            ));
        }

        for dest_dir in &dirs_dest {
            let rel = dest_dir.strip_prefix(dir_dest)?;
            let counterpart = dir_source.join(rel);
            if conditional_delete(&counterpart, dest_dir, &source_dirs, dry_run)? {
                output::print_user(&format!(" - deleting dir {}", dest_dir.display()));
            }
        }
    }

    output::print_user(&format!(
        "Stored {num_copied} files out of {num_checked} from \"{}\".",
        dir_source.display()
    ));
    if delete {
        output::print_user(&format!(
            "Deleted {num_deleted} files in destination directory."
        ));
    }
    info!(
        source = %dir_source.display(),
        copied = num_copied,
        deleted = num_deleted,
        "backup pair finished"
    );
    Ok(())
}
