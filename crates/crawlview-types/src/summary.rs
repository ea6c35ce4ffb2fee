use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary written by the crawling pipeline next to the latest snapshot
/// (`latest/summary.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_date_utc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_utc: Option<String>,
    pub rows: u64,
    #[serde(default)]
    pub crawler: String,
}

impl RunSummary {
    /// Interpret an arbitrary JSON value as a run summary.
    ///
    /// Any shape mismatch yields `None`; callers treat the summary as absent.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn status_line(&self) -> String {
        let crawler = if self.crawler.is_empty() {
            "all"
        } else {
            self.crawler.as_str()
        };
        format!(
            "Run {} · {} rows · crawler: {}",
            self.run_date_utc, self.rows, crawler
        )
    }
}
