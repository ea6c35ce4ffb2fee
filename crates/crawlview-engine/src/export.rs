use crate::flatten::flatten_value;
use crate::query::{QueryState, matching_records};
use chrono::{DateTime, Utc};
use crawlview_index::RecordStore;
use crawlview_types::Record;
use serde_json::Value;
use std::fmt;

const RECORD_COLUMNS: [&str; 5] = ["url", "name", "discovered_at_utc", "source", "domain"];

/// Metadata keys promoted to their own column
pub const EXPORT_META_COLUMNS: [&str; 7] = [
    "discovered_from",
    "file_ext",
    "date",
    "post_title",
    "office_tel",
    "email",
    "department_paths",
];

const CATCH_ALL_COLUMN: &str = "meta";

#[derive(Debug)]
pub enum ExportError {
    /// Nothing has been loaded
    NoRecords,
    /// Records are loaded but the active filters hide all of them
    NoMatchingRecords,
    /// The table writer failed
    Engine(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoRecords => write!(f, "No records loaded; nothing to export"),
            ExportError::NoMatchingRecords => {
                write!(f, "No records match the current filters; nothing to export")
            }
            ExportError::Engine(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Engine(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Fully materialized export, ready to serialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the export for `state`: every matching row across all pages, in
/// the current sort order. Without an active filter the whole store is
/// exported.
pub fn build_export_table(store: &RecordStore, state: &QueryState) -> Result<ExportTable> {
    if store.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let records = matching_records(store, state);
    if records.is_empty() {
        return Err(ExportError::NoMatchingRecords);
    }

    let headers = RECORD_COLUMNS
        .iter()
        .chain(EXPORT_META_COLUMNS.iter())
        .chain(std::iter::once(&CATCH_ALL_COLUMN))
        .map(|h| h.to_string())
        .collect();

    Ok(ExportTable {
        headers,
        rows: records.into_iter().map(export_row).collect(),
    })
}

fn export_row(record: &Record) -> Vec<String> {
    let mut row: Vec<String> = vec![
        record.url().to_string(),
        record.name().to_string(),
        record.discovered_at_utc().to_string(),
        record.source().to_string(),
        record.domain().to_string(),
    ];

    for key in EXPORT_META_COLUMNS {
        row.push(record.meta_value(key).map(flatten_value).unwrap_or_default());
    }

    row.push(remaining_meta(record));
    row
}

/// `key: value` lines for every metadata key without a dedicated column
fn remaining_meta(record: &Record) -> String {
    let Some(meta) = record.meta() else {
        return String::new();
    };

    meta.iter()
        .filter(|(key, _)| !EXPORT_META_COLUMNS.contains(&key.as_str()))
        .map(|(key, value): (&String, &Value)| format!("{}: {}", key, flatten_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize the whole table into memory. Callers write the bytes out only
/// when this succeeds, so a failed export never leaves a partial file.
pub fn export_csv(table: &ExportTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Engine(err.error().to_string()))
}

/// `crawl-urls-YYYY-MM-DD.csv` for the UTC day of `now`.
///
/// Callers pass `None` when the wall clock could not be turned into a UTC
/// date (set before the epoch, say), which gives `crawl-urls-undated.csv`.
pub fn export_file_name(now: Option<DateTime<Utc>>) -> String {
    match now {
        Some(now) => format!("crawl-urls-{}.csv", now.format("%Y-%m-%d")),
        None => "crawl-urls-undated.csv".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryEngine;
    use chrono::TimeZone;
    use serde_json::json;

    fn rec(url: &str, source: &str, meta: Value) -> Record {
        let meta = match meta {
            Value::Object(map) => Some(map),
            _ => None,
        };
        Record::new(url, "", "2024-01-02T00:00:00Z", source, meta)
    }

    fn store_of(records: Vec<Record>) -> RecordStore {
        let mut store = RecordStore::new();
        for r in records {
            store.push(r);
        }
        store.finish_load();
        store
    }

    #[test]
    fn test_empty_store_is_rejected() {
        let err = build_export_table(&RecordStore::new(), &QueryState::default()).unwrap_err();
        assert!(matches!(err, ExportError::NoRecords));
    }

    #[test]
    fn test_no_matches_is_rejected() {
        let store = store_of(vec![rec("https://a.hk/", "bd", Value::Null)]);
        let mut engine = QueryEngine::new();
        engine.set_source_filter(Some("devb"));

        let err = build_export_table(&store, engine.state()).unwrap_err();
        assert!(matches!(err, ExportError::NoMatchingRecords));
        assert_eq!(
            err.to_string(),
            "No records match the current filters; nothing to export"
        );
    }

    #[test]
    fn test_export_spans_all_pages() {
        let records = (0..120)
            .map(|i| rec(&format!("https://a.hk/{:03}", i), "bd", Value::Null))
            .collect();
        let store = store_of(records);
        let mut engine = QueryEngine::new();
        engine.set_page_size(10);
        engine.set_page(3);
        engine.execute(&store);

        let table = build_export_table(&store, engine.state()).unwrap();
        assert_eq!(table.len(), 120);
    }

    #[test]
    fn test_meta_columns_and_catch_all() {
        let store = store_of(vec![rec(
            "https://www.directory.gov.hk/x",
            "tel_directory",
            json!({
                "email": "a@b.hk",
                "department_paths": [["DEVB", "Works"], ["BD"]],
                "office_tel": 28482000,
                "extra_list": ["x", "y"],
                "extra_obj": {"k": 1},
                "nothing": null
            }),
        )]);

        let table = build_export_table(&store, &QueryState::default()).unwrap();
        assert_eq!(table.headers.len(), 13);
        assert_eq!(table.headers.last().map(String::as_str), Some("meta"));

        let row = &table.rows[0];
        assert_eq!(row[4], "www.directory.gov.hk");
        assert_eq!(row[5], "");
        assert_eq!(row[9], "28482000");
        assert_eq!(row[10], "a@b.hk");
        assert_eq!(row[11], r#"["DEVB","Works"]; ["BD"]"#);
        assert_eq!(row[12], "extra_list: x; y\nextra_obj: {\"k\":1}\nnothing: ");
    }

    #[test]
    fn test_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(Some(now)), "crawl-urls-2024-03-09.csv");
        assert_eq!(export_file_name(None), "crawl-urls-undated.csv");
    }
}
