pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod location;
pub mod memory;
pub mod publish;
pub mod session;
pub mod viewer;

pub use archive::{ArchiveListing, ArchiveResolver, ArchiveStrategy, Discovery, NO_ARCHIVES_STATUS};
pub use config::{RepoOrigin, SessionConfig, resolve_data_dir, resolve_repo};
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpClient, OpenedStream, open_file_stream};
pub use location::DatasetLocation;
pub use memory::MemoryFetcher;
pub use publish::{ArchiveIndex, RotationResult, build_archive_index, rotate_latest, write_archive_index};
pub use session::{
    CommitOutcome, DatasetSource, LoadGenerations, LoadTicket, LoadedDataset, Session,
    fetch_dataset, fetch_run_summary,
};
pub use viewer::load_viewer_config;
