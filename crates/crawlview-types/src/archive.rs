use serde::{Deserialize, Serialize};

/// One historical snapshot of the dataset.
///
/// `path` is relative to the dataset root, e.g. `archive/2024/01/02/urls.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub date: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

impl ArchiveEntry {
    pub fn new(date: impl Into<String>, path: impl Into<String>, bytes: Option<u64>) -> Self {
        Self {
            date: date.into(),
            path: path.into(),
            bytes,
        }
    }
}

/// Sort entries newest first. Dates are `YYYY-MM-DD`, so lexical order is
/// chronological.
pub fn sort_newest_first(entries: &mut [ArchiveEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Check for a `YYYY-MM-DD` shaped calendar date
pub fn is_archive_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() && s.len() == 10
}
