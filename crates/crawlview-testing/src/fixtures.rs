//! Sample datasets and publisher layouts.
//!
//! `SAMPLE_DATASET` has five records across three sources plus one
//! malformed line, so every load reports a skipped line.

pub const SAMPLE_DATASET: &str = concat!(
    r#"{"url":"https://www.devb.gov.hk/en/press/1.html","name":"Works Update, January","discovered_at_utc":"2024-01-03T08:00:00Z","source":"devb_press_releases","meta":{"date":"2024-01-03","file_ext":"html"}}"#,
    "\n",
    r#"{"url":"https://www.bd.gov.hk/en/pnap/APP-1.pdf","name":"PNAP APP-1","discovered_at_utc":"2024-01-02T08:00:00Z","source":"bd_basic_pages","meta":{"file_ext":"pdf"}}"#,
    "\n",
    r#"{"url":"https://www.directory.gov.hk/details.jsp?dn=100","name":"Chan Tai Man","discovered_at_utc":"2024-01-02T08:00:00Z","source":"tel_directory","meta":{"department_paths":[["Development Bureau","Works Branch"],["Development Bureau","Planning and Lands Branch"]],"office_tel":"2848 2000"}}"#,
    "\n",
    r#"{"url":"https://www.devb.gov.hk/en/press/2.html","name":"Works Tender","discovered_at_utc":"2024-01-01T08:00:00Z","source":"devb_press_releases"}"#,
    "\n",
    "this line is broken\n",
    r#"{"url":"https://www.bd.gov.hk/en/pnap/ADV-2.pdf","name":"PNAP ADV-2","discovered_at_utc":"","source":"bd_basic_pages"}"#,
    "\n",
);

/// Viewer configuration covering the directory source
pub const SAMPLE_VIEWER_CONFIG: &str = r#"{
  "version": 1,
  "defaults": {
    "fields": [
      { "label": "File type", "key": "file_ext" }
    ]
  },
  "sources": {
    "tel_directory": {
      "fields": [
        { "label": "Departments", "key": "department_paths", "format": "departments", "collapseAfter": 1 },
        { "label": "Telephone", "key": "office_tel", "fallbackKeys": ["tel"] },
        { "label": "Email", "key": "email", "format": "email" }
      ]
    }
  }
}
"#;

/// One JSONL line for a record without metadata
pub fn record_line(url: &str, name: &str, discovered_at_utc: &str, source: &str) -> String {
    let value = serde_json::json!({
        "url": url,
        "name": name,
        "discovered_at_utc": discovered_at_utc,
        "source": source,
    });
    format!("{}\n", value)
}

/// `n` records from one source, discovered on consecutive days of January 2024
pub fn numbered_dataset(n: usize, source: &str) -> String {
    (1..=n)
        .map(|i| {
            record_line(
                &format!("https://www.example.gov.hk/page/{:03}.html", i),
                &format!("Page {:03}", i),
                &format!("2024-01-{:02}T00:00:00Z", (i - 1) % 28 + 1),
                source,
            )
        })
        .collect()
}
