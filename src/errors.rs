//! Typed error definitions for filekit.
//! Provides a small set of well-known failure modes for better logs and tests.
//! All of these are fatal and surface before any file is touched.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilekitError {
    #[error("conflicting duplicate policies: --skip-existing and --keep-all are mutually exclusive")]
    ConflictingPolicies,

    #[error("paths cannot be reserved and freed at the same time: {}", format_paths(.0))]
    ReservationOverlap(Vec<PathBuf>),

    #[error("filter list has no column '{header}'; found headers: {}", .found.join(", "))]
    FilterHeaderMissing { header: String, found: Vec<String> },

    #[error("backup takes either --cfg-file or --dir-source/--dir-dest, not both")]
    ConflictingBackupSources,
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
