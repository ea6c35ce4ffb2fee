// Raw wire objects -> canonical Record
//
// Normalization never fails once a line is a JSON object: wrong-typed
// scalar fields become empty strings and a non-object `meta` is dropped.

use crawlview_types::{MalformedKind, Record};
use serde_json::{Map, Value};

/// Parse one JSONL line, classifying it when it is not a JSON object
pub fn normalize_line(line: &str) -> Result<Record, MalformedKind> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(obj)) => Ok(normalize_object(obj)),
        Ok(_) => Err(MalformedKind::NotAnObject),
        Err(_) => Err(MalformedKind::InvalidJson),
    }
}

pub fn normalize_object(mut obj: Map<String, Value>) -> Record {
    let meta = match obj.remove("meta") {
        Some(Value::Object(meta)) => Some(meta),
        _ => None,
    };

    Record::new(
        take_string(&mut obj, "url"),
        take_string(&mut obj, "name"),
        take_string(&mut obj, "discovered_at_utc"),
        take_string(&mut obj, "source"),
        meta,
    )
}

fn take_string(obj: &mut Map<String, Value>, key: &str) -> String {
    match obj.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let record = normalize_line(
            r#"{"url":"https://www.cedd.gov.hk/eng/publications/index.html","name":"Publications","discovered_at_utc":"2024-01-02T03:04:05+00:00","source":"cedd_geo_publications","meta":{"file_ext":"pdf"}}"#,
        )
        .unwrap();

        assert_eq!(record.url(), "https://www.cedd.gov.hk/eng/publications/index.html");
        assert_eq!(record.name(), "Publications");
        assert_eq!(record.source(), "cedd_geo_publications");
        assert_eq!(record.domain(), "www.cedd.gov.hk");
        assert_eq!(
            record.meta_value("file_ext").and_then(Value::as_str),
            Some("pdf")
        );
    }

    #[test]
    fn test_null_and_non_string_fields_become_empty() {
        let record =
            normalize_line(r#"{"url":"https://a.hk/x","name":null,"discovered_at_utc":42,"source":true}"#)
                .unwrap();

        assert_eq!(record.name(), "");
        assert_eq!(record.discovered_at_utc(), "");
        assert_eq!(record.source(), "");
        assert!(record.meta().is_none());
    }

    #[test]
    fn test_non_object_meta_is_dropped() {
        let record = normalize_line(r#"{"url":"https://a.hk/","meta":["x"]}"#).unwrap();
        assert!(record.meta().is_none());

        let record = normalize_line(r#"{"url":"https://a.hk/","meta":"text"}"#).unwrap();
        assert!(record.meta().is_none());
    }

    #[test]
    fn test_missing_url_yields_empty_domain() {
        let record = normalize_line(r#"{"name":"orphan"}"#).unwrap();
        assert_eq!(record.url(), "");
        assert_eq!(record.domain(), "");
    }

    #[test]
    fn test_non_object_lines_are_rejected() {
        assert_eq!(normalize_line("[1,2,3]"), Err(MalformedKind::NotAnObject));
        assert_eq!(normalize_line("42"), Err(MalformedKind::NotAnObject));
        assert_eq!(normalize_line("\"text\""), Err(MalformedKind::NotAnObject));
        assert_eq!(normalize_line("{not json"), Err(MalformedKind::InvalidJson));
        assert_eq!(normalize_line("{\"url\": \"x\""), Err(MalformedKind::InvalidJson));
    }
}
