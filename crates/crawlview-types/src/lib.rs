pub mod archive;
pub mod error;
pub mod record;
pub mod repo;
pub mod summary;
mod util;
pub mod viewer;

pub use archive::{ArchiveEntry, is_archive_date, sort_newest_first};
pub use error::{Error, Result};
pub use record::{MalformedKind, Record, domain_of};
pub use repo::RepoSelector;
pub use summary::RunSummary;
pub use util::*;
pub use viewer::{FieldDescriptor, FieldFormat, SourceFields, ViewerConfig};
