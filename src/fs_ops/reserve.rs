//! In-batch path reservation bookkeeping.
//!
//! While a batch is planned, the filesystem is not mutated, so collision
//! decisions need a rolling record of where paths WILL stand once the batch
//! completes: `taken` holds destinations claimed by earlier entries, `freed`
//! holds paths that exist on disk now but will have vacated. The two sets are
//! disjoint at all times; an overlap is a bug in the caller and fails fast.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::FilekitError;

#[derive(Debug, Default)]
pub struct ReservationSet {
    taken: HashSet<PathBuf>,
    freed: HashSet<PathBuf>,
}

impl ReservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations already claimed by earlier entries in this batch.
    pub fn taken(&self) -> &HashSet<PathBuf> {
        &self.taken
    }

    /// On-disk paths that will have vacated when the batch completes.
    pub fn freed(&self) -> &HashSet<PathBuf> {
        &self.freed
    }

    /// Mark `path` as vacating, making its current name reusable by later
    /// entries. Freeing a path another entry has claimed is an error.
    pub fn free(&mut self, path: &Path) -> Result<(), FilekitError> {
        if self.taken.contains(path) {
            return Err(FilekitError::ReservationOverlap(vec![path.to_path_buf()]));
        }
        self.freed.insert(path.to_path_buf());
        Ok(())
    }

    /// Claim `path` as a future destination. A path pending vacation may be
    /// re-claimed; it then moves from `freed` to `taken`.
    pub fn take(&mut self, path: &Path) -> Result<(), FilekitError> {
        self.freed.remove(path);
        self.taken.insert(path.to_path_buf());
        Ok(())
    }

    /// Withdraw a pending vacate record; the entry turned out not to move.
    pub fn cancel_free(&mut self, path: &Path) {
        self.freed.remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn take_moves_path_out_of_freed() {
        let mut r = ReservationSet::new();
        let p = PathBuf::from("/tmp/a.txt");
        r.free(&p).unwrap();
        assert!(r.freed().contains(&p));
        r.take(&p).unwrap();
        assert!(r.taken().contains(&p));
        assert!(!r.freed().contains(&p));
    }

    #[test]
    fn freeing_a_taken_path_fails_fast() {
        let mut r = ReservationSet::new();
        let p = PathBuf::from("/tmp/b.txt");
        r.take(&p).unwrap();
        let err = r.free(&p).unwrap_err();
        assert!(matches!(err, FilekitError::ReservationOverlap(ref v) if v == &vec![p]));
    }

    #[test]
    fn cancel_free_withdraws_record() {
        let mut r = ReservationSet::new();
        let p = PathBuf::from("/tmp/c.txt");
        r.free(&p).unwrap();
        r.cancel_free(&p);
        assert!(r.freed().is_empty());
    }
}
