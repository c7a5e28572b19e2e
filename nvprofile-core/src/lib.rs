#![forbid(unsafe_code)]

pub mod descriptor;
pub mod domain;
pub mod error;
pub mod settings;

pub mod pack {
    pub mod walker;
    pub mod writer;
}

pub mod read {
    pub mod archive;
    pub mod restore;
}

pub mod list;

// Re-exports: stable API surface
pub use descriptor::{DESCRIPTOR_NAME, ProfileDescriptor};
pub use domain::{BackupSummary, RestoreSummary};
pub use error::{ErrorKind, ProfileError};
pub use list::{Inspection, ListingTree, TreeNode, inspect, list};
pub use pack::writer::{create, create_with_summary};
pub use read::restore::{RestoreOptions, RestoreStrategy, restore, restore_with};
