//! Mirror-style backup primitives: conditional copies and orphan deletion.
//!
//! Decisions are made on modification times only, never content hashes. A
//! one-second tolerance absorbs timestamp-granularity differences between
//! filesystems.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use filetime::FileTime;
use tracing::debug;
use walkdir::WalkDir;

use super::como::copy_with_mtime;

/// What a conditional copy decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Destination was missing.
    Adding,
    /// Source is strictly newer than the destination.
    Updating,
}

impl SyncAction {
    pub fn verb(self) -> &'static str {
        match self {
            SyncAction::Adding => "adding",
            SyncAction::Updating => "updating",
        }
    }
}

const MTIME_TOLERANCE_SECS: i64 = 1;

fn mtime(path: &Path) -> Result<FileTime> {
    let meta =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(FileTime::from_last_modification_time(&meta))
}

/// Copy `source` over `dest` only when the destination is missing or the
/// source is more than a second newer. Returns the action taken, if any;
/// dry runs decide identically without copying.
pub fn conditional_copy(source: &Path, dest: &Path, dry_run: bool) -> Result<Option<SyncAction>> {
    let action = if !dest.exists() {
        Some(SyncAction::Adding)
    } else if mtime(source)?.unix_seconds() - mtime(dest)?.unix_seconds() > MTIME_TOLERANCE_SECS {
        Some(SyncAction::Updating)
    } else {
        None
    };

    if let Some(a) = action
        && !dry_run
    {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        copy_with_mtime(source, dest)?;
        debug!(source = %source.display(), dest = %dest.display(), action = a.verb(), "synced");
    }
    Ok(action)
}

/// Delete `dest` when its source-side counterpart is absent from the current
/// source listing. Directories go recursively. Returns whether the entry is
/// an orphan; a destination already removed with an ancestor is still
/// reported, keeping dry-run output identical to a real run.
pub fn conditional_delete(
    source_counterpart: &Path,
    dest: &Path,
    source_listing: &HashSet<PathBuf>,
    dry_run: bool,
) -> Result<bool> {
    if source_listing.contains(source_counterpart) {
        return Ok(false);
    }
    if !dry_run && dest.symlink_metadata().is_ok() {
        if dest.is_dir() {
            fs::remove_dir_all(dest)
                .with_context(|| format!("Failed to delete dir {}", dest.display()))?;
        } else {
            fs::remove_file(dest)
                .with_context(|| format!("Failed to delete {}", dest.display()))?;
        }
        debug!(dest = %dest.display(), "pruned orphan");
    }
    Ok(true)
}

/// All files and directories under `root`, split by kind.
pub fn list_filedirs(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }
    Ok((files, dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_destination_is_added() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, b"x").unwrap();
        let dest = td.path().join("backup").join("a.txt");

        let action = conditional_copy(&src, &dest, false).unwrap();
        assert_eq!(action, Some(SyncAction::Adding));
        assert!(dest.exists());
    }

    #[test]
    fn newer_source_updates_destination() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();
        filetime::set_file_mtime(&dest, FileTime::from_unix_time(1_000_000, 0)).unwrap();

        let action = conditional_copy(&src, &dest, false).unwrap();
        assert_eq!(action, Some(SyncAction::Updating));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn equal_mtimes_do_nothing() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();
        let t = FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(&src, t).unwrap();
        filetime::set_file_mtime(&dest, t).unwrap();

        assert_eq!(conditional_copy(&src, &dest, false).unwrap(), None);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");
    }

    #[test]
    fn dry_run_decides_without_copying() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, b"x").unwrap();
        let dest = td.path().join("backup").join("a.txt");

        let action = conditional_copy(&src, &dest, true).unwrap();
        assert_eq!(action, Some(SyncAction::Adding));
        assert!(!dest.exists());
    }

    #[test]
    fn orphans_are_deleted_survivors_kept() {
        let td = tempdir().unwrap();
        let orphan = td.path().join("orphan.txt");
        let kept = td.path().join("kept.txt");
        fs::write(&orphan, b"x").unwrap();
        fs::write(&kept, b"x").unwrap();
        let listing: HashSet<PathBuf> = [td.path().join("src").join("kept.txt")].into();

        assert!(conditional_delete(
            &td.path().join("src").join("orphan.txt"),
            &orphan,
            &listing,
            false
        )
        .unwrap());
        assert!(!conditional_delete(
            &td.path().join("src").join("kept.txt"),
            &kept,
            &listing,
            false
        )
        .unwrap());
        assert!(!orphan.exists());
        assert!(kept.exists());
    }

    #[test]
    fn orphan_directories_go_recursively() {
        let td = tempdir().unwrap();
        let dir = td.path().join("old");
        fs::create_dir_all(dir.join("deep")).unwrap();
        fs::write(dir.join("deep").join("f.txt"), b"x").unwrap();

        assert!(conditional_delete(
            &td.path().join("src").join("old"),
            &dir,
            &HashSet::new(),
            false
        )
        .unwrap());
        assert!(!dir.exists());
    }
}
