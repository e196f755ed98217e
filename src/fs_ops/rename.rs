//! Batch rename engine: build a side-effect-free plan, then apply it.
//!
//! Planning walks the selected files once, in order, resolving every
//! collision against live disk state plus the rolling reservation set. The
//! resulting [`RenamePlan`] encodes exactly the decisions a commit makes, so
//! the preview pass and the commit pass print the same thing.
//!
//! Names vacated during the batch may be reused by other entries: renaming
//! A -> B while B -> A in the same batch exchanges the two names without any
//! suffix artifacts. Applying such a plan in order with bare `fs::rename`
//! would clobber the occupant on POSIX, so entries whose destination is still
//! occupied are staged through a sidestep name and settled once every source
//! has moved.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::reserve::ReservationSet;
use super::transform::{NameTransform, Transformed};
use super::unique::unique_path;

/// What will happen to one selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Name changes; a rename will be performed.
    Rename,
    /// Transform produced forbidden characters; the file is left untouched.
    BadCharacters,
    /// The resolved name equals the current one; nothing to do.
    NoOp,
}

/// One planned entry: where a file is and where it will end up.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub source: PathBuf,
    /// Name the transform asked for, before uniqueness resolution.
    pub proposed: String,
    pub resolved: PathBuf,
    pub action: EntryAction,
    pub illegal: Vec<char>,
    /// True when uniqueness resolution had to move away from the proposal.
    pub had_conflict: bool,
}

/// Side-effect-free outcome of a planning pass.
#[derive(Debug, Default)]
pub struct RenamePlan {
    pub entries: Vec<PlanEntry>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameCounts {
    pub total: usize,
    pub renames: usize,
    pub bad_characters: usize,
    pub conflicts: usize,
    pub no_ops: usize,
}

impl RenamePlan {
    pub fn counts(&self) -> RenameCounts {
        let mut c = RenameCounts {
            total: self.entries.len(),
            ..Default::default()
        };
        for e in &self.entries {
            match e.action {
                EntryAction::Rename => c.renames += 1,
                EntryAction::BadCharacters => c.bad_characters += 1,
                EntryAction::NoOp => c.no_ops += 1,
            }
            if e.had_conflict {
                c.conflicts += 1;
            }
        }
        c
    }
}

fn file_name_str(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Plan renames for `files` in enumeration order.
///
/// Sources whose proposed name differs are seeded into the freed set up
/// front, so an entry may claim a name that a sibling entry is vacating
/// (the swap case). Entries that resolve back to their own name are
/// withdrawn again.
pub fn build_plan(files: &[PathBuf], transform: &NameTransform) -> Result<RenamePlan> {
    let mut reservations = ReservationSet::new();

    let proposals: Vec<(PathBuf, Transformed)> = files
        .iter()
        .map(|f| (f.clone(), transform.apply(&file_name_str(f))))
        .collect();

    for (source, t) in &proposals {
        if t.illegal.is_empty() && t.name != file_name_str(source) {
            reservations.free(source)?;
        }
    }

    let mut entries = Vec::with_capacity(proposals.len());
    for (source, t) in proposals {
        if !t.illegal.is_empty() {
            debug!(source = %source.display(), chars = ?t.illegal, "skipping: forbidden characters");
            entries.push(PlanEntry {
                resolved: source.clone(),
                source,
                proposed: t.name,
                action: EntryAction::BadCharacters,
                illegal: t.illegal,
                had_conflict: false,
            });
            continue;
        }

        let candidate = source.with_file_name(&t.name);
        let mut allow: HashSet<PathBuf> = reservations.freed().clone();
        // The file's own name only stays reusable while no earlier entry has
        // claimed it; `take` already moved such names out of the freed set.
        if !reservations.taken().contains(&source) {
            allow.insert(source.clone());
        }
        let resolved = unique_path(&candidate, reservations.taken(), &allow)?;
        let had_conflict = resolved != candidate;

        if resolved == source {
            reservations.cancel_free(&source);
            entries.push(PlanEntry {
                resolved: source.clone(),
                source,
                proposed: t.name,
                action: EntryAction::NoOp,
                illegal: Vec::new(),
                had_conflict,
            });
            continue;
        }

        reservations.take(&resolved)?;
        entries.push(PlanEntry {
            source,
            proposed: t.name,
            resolved,
            action: EntryAction::Rename,
            illegal: Vec::new(),
            had_conflict,
        });
    }

    Ok(RenamePlan { entries })
}

/// Apply a plan's rename entries, in order.
///
/// An entry whose destination still exists is blocked by a batch member that
/// has not moved yet: its source is staged to a sidestep name first. Once the
/// first pass completes every source path has vacated, and the staged entries
/// settle onto their final names.
pub fn apply_plan(plan: &RenamePlan) -> Result<RenameCounts> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();

    for (idx, entry) in plan.entries.iter().enumerate() {
        if entry.action != EntryAction::Rename {
            continue;
        }
        if entry.resolved.exists() {
            let sidestep = entry
                .source
                .with_file_name(format!(".filekit-staged-{}-{idx}", std::process::id()));
            fs::rename(&entry.source, &sidestep).with_context(|| {
                format!(
                    "Failed to stage {} -> {}",
                    entry.source.display(),
                    sidestep.display()
                )
            })?;
            debug!(source = %entry.source.display(), via = %sidestep.display(), "staged blocked rename");
            staged.push((sidestep, entry.resolved.clone()));
        } else {
            fs::rename(&entry.source, &entry.resolved).with_context(|| {
                format!(
                    "Failed to rename {} -> {}",
                    entry.source.display(),
                    entry.resolved.display()
                )
            })?;
        }
    }

    for (sidestep, resolved) in staged {
        fs::rename(&sidestep, &resolved).with_context(|| {
            format!(
                "Failed to settle {} -> {}",
                sidestep.display(),
                resolved.display()
            )
        })?;
    }

    let counts = plan.counts();
    info!(
        renamed = counts.renames,
        skipped_bad = counts.bad_characters,
        no_ops = counts.no_ops,
        "rename batch applied"
    );
    Ok(counts)
}
