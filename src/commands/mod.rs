//! One handler per subcommand. Each handler owns its own file selector and
//! drives the matching engine under [`crate::fs_ops`].

pub mod backup;
pub mod como;
pub mod delete;
pub mod rename;
pub mod tree;
pub mod usage;

pub use backup::BackupCmd;
pub use como::ComoCmd;
pub use delete::DeleteCmd;
pub use rename::RenameCmd;
pub use tree::TreeCmd;
pub use usage::UsageCmd;
