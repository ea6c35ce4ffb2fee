mod context;

pub mod archives;
pub mod export;
pub mod facets;
pub mod list;
pub mod publish;
pub mod repo;
pub mod show;
pub mod stats;

pub use context::{apply_query, load_session};
