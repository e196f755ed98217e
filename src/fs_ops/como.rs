//! Copy/move engine with destination conflict policies.
//!
//! Destinations mirror the source-relative path under the destination root,
//! or flatten to its direct children. Keep-all collisions are resolved
//! against live disk state plus an in-batch claim set, so a dry run makes
//! exactly the decisions a real run makes even when several sources flatten
//! to the same name.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use filetime::FileTime;
use tracing::{debug, info, warn};

use crate::errors::FilekitError;
use crate::output;

use super::unique::unique_path;

/// How a pre-existing destination path is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Replace the existing file (reported as replacing).
    #[default]
    Overwrite,
    /// Leave the existing file alone and skip the source entirely.
    SkipExisting,
    /// Keep both: suffix the incoming file with ` (n)`.
    KeepAll,
}

impl ConflictPolicy {
    /// Resolve the two CLI flags. Requesting both is a configuration error,
    /// raised before any file is read.
    pub fn from_flags(skip_existing: bool, keep_all: bool) -> Result<Self, FilekitError> {
        match (skip_existing, keep_all) {
            (true, true) => Err(FilekitError::ConflictingPolicies),
            (true, false) => Ok(Self::SkipExisting),
            (false, true) => Ok(Self::KeepAll),
            (false, false) => Ok(Self::Overwrite),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn verb(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub dir_source: PathBuf,
    pub dir_dest: PathBuf,
    pub mode: TransferMode,
    pub policy: ConflictPolicy,
    /// Drop the source directory structure and place every file directly
    /// under the destination root.
    pub flatten: bool,
    pub dry_run: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferCounts {
    pub selected: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub replaced: usize,
    pub renamed: usize,
}

/// Run one copy/move batch over `files`, reporting a line per file. Dry runs
/// print the same lines and return the same counts without touching disk.
pub fn transfer(req: &TransferRequest, files: &[PathBuf]) -> Result<TransferCounts> {
    let mut counts = TransferCounts {
        selected: files.len(),
        ..Default::default()
    };
    // Destinations already claimed in this batch; keeps keep-all decisions
    // identical between dry runs and real runs.
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let allow_none: HashSet<PathBuf> = HashSet::new();

    if !req.dry_run {
        fs::create_dir_all(&req.dir_dest).with_context(|| {
            format!(
                "Failed to create destination dir {}",
                req.dir_dest.display()
            )
        })?;
    }

    for (idx, source) in files.iter().enumerate() {
        let raw_dest = if req.flatten {
            let name = source
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Source missing a file name: {}", source.display()))?;
            req.dir_dest.join(name)
        } else {
            let rel = source.strip_prefix(&req.dir_source).with_context(|| {
                format!(
                    "Source {} is not under {}",
                    source.display(),
                    req.dir_source.display()
                )
            })?;
            req.dir_dest.join(rel)
        };

        let occupied = raw_dest.exists() || claimed.contains(&raw_dest);
        let (dest, note) = match req.policy {
            ConflictPolicy::Overwrite => {
                if occupied {
                    counts.replaced += 1;
                    (raw_dest, " (replacing)")
                } else {
                    (raw_dest, "")
                }
            }
            ConflictPolicy::SkipExisting => {
                if occupied {
                    counts.skipped += 1;
                    output::print_user(&format!(
                        "{} {} -> {} (skipped: exists)",
                        req.mode.verb(),
                        source.display(),
                        raw_dest.display()
                    ));
                    continue;
                }
                (raw_dest, "")
            }
            ConflictPolicy::KeepAll => {
                let resolved = unique_path(&raw_dest, &claimed, &allow_none)?;
                if resolved != raw_dest {
                    counts.renamed += 1;
                    (resolved, " (renamed)")
                } else {
                    (resolved, "")
                }
            }
        };

        output::print_user(&format!(
            "{} {} -> {}{note}",
            req.mode.verb(),
            source.display(),
            dest.display()
        ));

        claimed.insert(dest.clone());
        if !req.dry_run {
            if !req.flatten
                && let Some(parent) = dest.parent()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            match req.mode {
                TransferMode::Copy => copy_with_mtime(source, &dest)?,
                TransferMode::Move => move_file(source, &dest)?,
            }
            debug!(source = %source.display(), dest = %dest.display(), "transferred");
        }
        counts.transferred += 1;
        output::print_user(&output::progress_bar(
            idx + 1,
            files.len(),
            "of files processed",
        ));
    }

    info!(
        mode = req.mode.verb(),
        transferred = counts.transferred,
        skipped = counts.skipped,
        "transfer batch finished"
    );
    Ok(counts)
}

/// Copy preserving the source's modification time.
pub(crate) fn copy_with_mtime(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest)
        .with_context(|| format!("Copy failed {} -> {}", source.display(), dest.display()))?;
    let meta = fs::metadata(source)
        .with_context(|| format!("Failed to stat {}", source.display()))?;
    filetime::set_file_mtime(dest, FileTime::from_last_modification_time(&meta))
        .with_context(|| format!("Failed to set mtime on {}", dest.display()))?;
    Ok(())
}

/// Move with atomic rename, falling back to copy+remove across filesystems.
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "Atomic rename failed, falling back to copy+remove");
            copy_with_mtime(source, dest)?;
            fs::remove_file(source)
                .with_context(|| format!("Failed to remove original file {}", source.display()))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn request(
        src: &Path,
        dst: &Path,
        mode: TransferMode,
        policy: ConflictPolicy,
    ) -> TransferRequest {
        TransferRequest {
            dir_source: src.to_path_buf(),
            dir_dest: dst.to_path_buf(),
            mode,
            policy,
            flatten: false,
            dry_run: false,
        }
    }

    #[test]
    fn both_policies_at_once_is_a_configuration_error() {
        let err = ConflictPolicy::from_flags(true, true).unwrap_err();
        assert!(matches!(err, FilekitError::ConflictingPolicies));
        assert_eq!(
            ConflictPolicy::from_flags(false, false).unwrap(),
            ConflictPolicy::Overwrite
        );
    }

    #[test]
    fn relative_paths_are_mirrored() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub").join("deep.txt"), b"deep").unwrap();

        let req = request(&src, &dst, TransferMode::Copy, ConflictPolicy::Overwrite);
        let counts = transfer(&req, &[src.join("sub").join("deep.txt")]).unwrap();
        assert_eq!(counts.transferred, 1);
        assert_eq!(
            fs::read_to_string(dst.join("sub").join("deep.txt")).unwrap(),
            "deep"
        );
    }

    #[test]
    fn skip_existing_leaves_destination_alone() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.txt"), b"new").unwrap();
        fs::write(dst.join("a.txt"), b"old").unwrap();

        let req = request(&src, &dst, TransferMode::Copy, ConflictPolicy::SkipExisting);
        let counts = transfer(&req, &[src.join("a.txt")]).unwrap();
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.transferred, 0);
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "old");
    }

    #[test]
    fn keep_all_suffixes_instead_of_replacing() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.txt"), b"new").unwrap();
        fs::write(dst.join("a.txt"), b"old").unwrap();

        let req = request(&src, &dst, TransferMode::Copy, ConflictPolicy::KeepAll);
        let counts = transfer(&req, &[src.join("a.txt")]).unwrap();
        assert_eq!(counts.renamed, 1);
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(dst.join("a (2).txt")).unwrap(), "new");
    }

    #[test]
    fn move_removes_the_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("m.txt"), b"gone").unwrap();

        let req = request(&src, &dst, TransferMode::Move, ConflictPolicy::Overwrite);
        transfer(&req, &[src.join("m.txt")]).unwrap();
        assert!(!src.join("m.txt").exists());
        assert_eq!(fs::read_to_string(dst.join("m.txt")).unwrap(), "gone");
    }

    #[test]
    fn copy_preserves_mtime() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("t.txt"), b"x").unwrap();
        let old = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(src.join("t.txt"), old).unwrap();

        let req = request(&src, &dst, TransferMode::Copy, ConflictPolicy::Overwrite);
        transfer(&req, &[src.join("t.txt")]).unwrap();
        let copied = fs::metadata(dst.join("t.txt")).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&copied).unix_seconds(),
            old.unix_seconds()
        );
    }
}
