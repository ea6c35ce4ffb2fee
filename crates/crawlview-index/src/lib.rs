// In-memory record index
// Records keep file arrival order; facets are derived once per completed load

mod facets;
mod stats;
mod store;

// Public API
pub use facets::{Facet, build_facets};
pub use stats::{DatasetStats, MISSING_SOURCE, QualityCounts, SourceStats};
pub use store::{MALFORMED_SAMPLE_LIMIT, MalformedLine, RecordStore};
