// Error types
pub mod error;

// Chunked UTF-8 decoding into lines
pub mod line_reader;

// Raw JSON object -> Record
pub mod normalize;

// Async stream ingestion into a RecordStore
pub mod loader;

pub use error::{Error, Result};
pub use line_reader::LineReader;
pub use loader::{LoadProgress, LoadStats, PROGRESS_EVERY_LINES, ingest_stream};
pub use normalize::{normalize_line, normalize_object};
