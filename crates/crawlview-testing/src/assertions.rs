//! Assertions over `--format json` output.

use anyhow::{Context, Result};
use serde_json::Value;

/// URLs of the `rows` array of `list` output, in display order
pub fn row_urls(json: &Value) -> Result<Vec<String>> {
    let rows = json["rows"]
        .as_array()
        .context("Expected 'rows' array in JSON")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row["url"]
                .as_str()
                .map(str::to_string)
                .with_context(|| format!("Row {} missing url", i))
        })
        .collect()
}

pub fn assert_row_urls(json: &Value, expected: &[&str]) -> Result<()> {
    let urls = row_urls(json)?;
    if urls != expected {
        anyhow::bail!("Expected rows {:?}, got {:?}", expected, urls);
    }
    Ok(())
}

pub fn assert_filtered_count(json: &Value, expected: u64) -> Result<()> {
    let count = json["filtered_count"]
        .as_u64()
        .context("Expected 'filtered_count' in JSON")?;
    if count != expected {
        anyhow::bail!("Expected {} matching records, got {}", expected, count);
    }
    Ok(())
}

/// `(value, count)` pairs of a facet list such as `sources` or `domains`
pub fn facet_pairs(json: &Value, key: &str) -> Result<Vec<(String, u64)>> {
    let facets = json[key]
        .as_array()
        .with_context(|| format!("Expected '{}' array in JSON", key))?;

    facets
        .iter()
        .map(|f| {
            let value = f["value"].as_str().context("Facet missing value")?;
            let count = f["count"].as_u64().context("Facet missing count")?;
            Ok((value.to_string(), count))
        })
        .collect()
}

/// Value of the detail row with `label`, rendered as the CLI JSON shows it
pub fn detail_row<'a>(json: &'a Value, label: &str) -> Result<&'a Value> {
    json["rows"]
        .as_array()
        .context("Expected 'rows' array in JSON")?
        .iter()
        .find(|row| row["label"] == label)
        .map(|row| &row["value"])
        .with_context(|| format!("No detail row labelled {}", label))
}
