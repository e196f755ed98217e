//! Core library for `filekit`.
//!
//! Batch file-system maintenance: collision-safe renaming, copy/move with
//! destination conflict policies, filtered deletion, mirror-style backups and
//! simple reporting (directory tree, disk usage).
//!
//! Every batch runs the same way: a [`selector::FileSelector`] produces a
//! bounded, ordered file list, and an engine under [`fs_ops`] walks it once,
//! consulting in-memory path reservations before any filesystem mutation.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod selector;

pub use errors::FilekitError;
