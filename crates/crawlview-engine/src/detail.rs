// Detail projection: Record + ViewerConfig -> ordered label/value rows
//
// The five base rows always come first and only read the record itself.
// Configured rows follow, resolved from `meta` through each descriptor's
// key and fallback keys.

use crate::flatten::{flatten_value, is_blank};
use crawlview_types::{FieldDescriptor, FieldFormat, Record, ViewerConfig, parse_timestamp};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Source whose email rows are always shown, with a placeholder when empty
pub const SPECIAL_EMAIL_SOURCE: &str = "tel_directory";

pub const NOT_AVAILABLE: &str = "N/A";

const BASE_LABELS: [&str; 5] = ["URL", "Name", "Discovered", "Source", "Website"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailValue {
    Text { text: String },
    Link { href: String },
    /// Department paths; `collapsed` lines sit behind a "show more" disclosure
    Lines {
        shown: Vec<String>,
        collapsed: Vec<String>,
    },
}

impl DetailValue {
    fn text(text: impl Into<String>) -> Self {
        DetailValue::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: DetailValue,
}

impl DetailRow {
    fn new(label: impl Into<String>, value: DetailValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

pub fn project_detail(record: &Record, config: &ViewerConfig) -> Vec<DetailRow> {
    let mut rows = base_rows(record);
    let mut seen: HashSet<&str> = BASE_LABELS.into_iter().collect();

    for field in config.fields_for(record.source()) {
        if seen.contains(field.label.as_str()) {
            continue;
        }
        if let Some(value) = render_field(record, field) {
            seen.insert(field.label.as_str());
            rows.push(DetailRow::new(field.label.clone(), value));
        }
    }

    rows
}

fn base_rows(record: &Record) -> Vec<DetailRow> {
    let url = if record.url().is_empty() {
        DetailValue::text("")
    } else {
        DetailValue::Link {
            href: record.url().to_string(),
        }
    };

    vec![
        DetailRow::new(BASE_LABELS[0], url),
        DetailRow::new(BASE_LABELS[1], DetailValue::text(record.name())),
        DetailRow::new(BASE_LABELS[2], DetailValue::text(record.discovered_at_utc())),
        DetailRow::new(BASE_LABELS[3], DetailValue::text(record.source())),
        DetailRow::new(BASE_LABELS[4], DetailValue::text(record.domain())),
    ]
}

/// First present, non-blank value among the descriptor's keys
fn resolve<'a>(record: &'a Record, field: &FieldDescriptor) -> Option<&'a Value> {
    field
        .lookup_keys()
        .filter_map(|key| record.meta_value(key))
        .find(|value| !is_blank(value))
}

fn render_field(record: &Record, field: &FieldDescriptor) -> Option<DetailValue> {
    let value = resolve(record, field);

    match field.format {
        FieldFormat::Plain => value.map(|v| DetailValue::text(flatten_value(v))),
        FieldFormat::Departments => {
            let lines = department_lines(value?);
            if lines.is_empty() {
                return None;
            }
            let split = field.collapse_after().min(lines.len());
            let mut shown = lines;
            let collapsed = shown.split_off(split);
            Some(DetailValue::Lines { shown, collapsed })
        }
        FieldFormat::Email => match value {
            Some(v) => Some(DetailValue::text(flatten_value(v))),
            None if record.source() == SPECIAL_EMAIL_SOURCE => {
                Some(DetailValue::text(NOT_AVAILABLE))
            }
            None => None,
        },
        FieldFormat::Date => value.map(|v| DetailValue::text(format_date(v))),
        FieldFormat::Url => match value? {
            Value::String(href) => Some(DetailValue::Link {
                href: href.trim().to_string(),
            }),
            _ => None,
        },
    }
}

/// One `a -> b -> c` line per department path
fn department_lines(value: &Value) -> Vec<String> {
    let paths: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    paths
        .into_iter()
        .map(|path| match path {
            Value::Array(segments) => segments
                .iter()
                .map(flatten_value)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" -> "),
            other => flatten_value(other).trim().to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Human date anchored to UTC; values that do not parse are shown verbatim
fn format_date(value: &Value) -> String {
    let raw = flatten_value(value);
    match parse_timestamp(&raw) {
        Some(dt) => dt.format("%-d %b %Y").to_string(),
        None => raw,
    }
}
