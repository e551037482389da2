// System Layer
pub mod archive;
pub mod cache;
pub mod runner;

pub use archive::{run_operation, ArchiveSummary, CompressOptions};
pub use cache::{ArchiveMetadataCache, SharedMetadataCache};
pub use runner::{OperationListener, OperationRunner, RunnerEvent};
