//! Collision-free destination naming.
//!
//! The resolver consults both live disk state and the caller's in-memory
//! reservations: `avoid` holds paths claimed by earlier batch entries, and
//! paths in `allow` never count as collisions because they are about to
//! vacate. When the candidate is taken, a ` (n)` suffix goes before the
//! extension, continuing an existing numbered suffix instead of stacking a
//! second one.

use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::errors::FilekitError;

static NUMBERED_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \((\d+)\)$").unwrap());

/// Resolve a non-colliding path for `candidate`.
///
/// `candidate` itself is returned when it is in `allow`, or when it neither
/// exists on disk nor sits in `avoid`. The suffix search is unbounded;
/// directories crowded with numbered variants degrade linearly.
///
/// Precondition: `avoid` and `allow` must be disjoint.
pub fn unique_path(
    candidate: &Path,
    avoid: &HashSet<PathBuf>,
    allow: &HashSet<PathBuf>,
) -> Result<PathBuf, FilekitError> {
    let mut overlap: Vec<PathBuf> = avoid.intersection(allow).cloned().collect();
    if !overlap.is_empty() {
        overlap.sort();
        return Err(FilekitError::ReservationOverlap(overlap));
    }

    let colliding = |p: &Path| (p.exists() || avoid.contains(p)) && !allow.contains(p);
    if !colliding(candidate) {
        return Ok(candidate.to_path_buf());
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate.extension().map(|e| e.to_string_lossy().into_owned());

    let (base, start) = match NUMBERED_STEM
        .captures(&stem)
        .and_then(|c| Some((c[1].to_string(), c[2].parse::<u64>().ok()? + 1)))
    {
        Some(parsed) => parsed,
        None => (stem, 2),
    };

    let mut n = start;
    loop {
        let name = match &ext {
            Some(e) => format!("{base} ({n}).{e}"),
            None => format!("{base} ({n})"),
        };
        let next = candidate.with_file_name(name);
        if !colliding(&next) {
            return Ok(next);
        }
        n += 1;
    }
}
