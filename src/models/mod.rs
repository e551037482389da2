// Data Models
pub mod archive_entry;
pub mod archive_tree;
pub mod operation;

pub use archive_entry::{ArchiveEntry, ArchiveMetadata};
pub use archive_tree::{ArchiveTree, TreeNode, TreeRow};
pub use operation::{CancelToken, OperationKind, OperationRequest, ProgressTracker};
