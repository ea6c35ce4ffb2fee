use serde_json::Value;

/// Render a metadata value as a single line of text.
///
/// Lists are joined with `"; "`, objects (and lists nested inside lists)
/// become compact JSON, scalars are stringified and null is empty.
pub fn flatten_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Object(_) => compact(item),
                other => flatten_value(other),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => compact(value),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
    }
}

/// Null, whitespace-only strings and empty containers carry no information
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
