//! Filesystem batch engines and the path-collision machinery they share.

pub mod backup;
pub mod como;
pub mod rename;
pub mod reserve;
pub mod transform;
pub mod unique;

pub use como::{ConflictPolicy, TransferCounts, TransferMode, TransferRequest};
pub use rename::{EntryAction, PlanEntry, RenameCounts, RenamePlan};
pub use reserve::ReservationSet;
pub use transform::{NameTransform, Transformed, FORBIDDEN_CHARS};
pub use unique::unique_path;
