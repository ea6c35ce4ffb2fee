use super::{ArchiveStrategy, Discovery};
use crate::fetch::Fetcher;
use crate::location::DatasetLocation;
use crate::{Error, Result};
use async_trait::async_trait;
use crawlview_types::{ArchiveEntry, is_archive_date, sort_newest_first};
use serde_json::Value;
use std::sync::Arc;

/// Tier 1: the `archive/index.json` document written by the publisher
pub struct IndexDocumentStrategy {
    fetcher: Arc<dyn Fetcher>,
    location: DatasetLocation,
}

impl IndexDocumentStrategy {
    pub fn new(fetcher: Arc<dyn Fetcher>, location: DatasetLocation) -> Self {
        Self { fetcher, location }
    }

    async fn fetch(&self) -> Result<Vec<ArchiveEntry>> {
        let url = self.location.archive_index_url()?;
        let document = self.fetcher.get_json(&url).await?;
        parse_index_document(&document, &self.location)
    }
}

#[async_trait]
impl ArchiveStrategy for IndexDocumentStrategy {
    fn name(&self) -> &'static str {
        "index"
    }

    async fn discover(&self) -> Discovery {
        match self.fetch().await {
            Ok(entries) => Discovery::Found(entries),
            Err(err) => Discovery::Unavailable(err.to_string()),
        }
    }
}

/// Accepts `{"archives": [...]}` or a bare list. Entries without a usable
/// date or path are dropped; anything else shaped wrong fails the document.
pub fn parse_index_document(
    document: &Value,
    location: &DatasetLocation,
) -> Result<Vec<ArchiveEntry>> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("archives") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::UnexpectedDocument(
                    "archive index has no `archives` list".to_string(),
                ));
            }
        },
        _ => {
            return Err(Error::UnexpectedDocument(
                "archive index is neither an object nor a list".to_string(),
            ));
        }
    };

    let mut entries: Vec<ArchiveEntry> = items
        .iter()
        .filter_map(|item| index_entry(item, location))
        .collect();
    sort_newest_first(&mut entries);
    Ok(entries)
}

fn index_entry(item: &Value, location: &DatasetLocation) -> Option<ArchiveEntry> {
    let date = item.get("date")?.as_str()?.trim();
    if !is_archive_date(date) {
        return None;
    }

    let path = location.strip_root(item.get("path")?.as_str()?.trim());
    if path.is_empty() {
        return None;
    }

    let bytes = item.get("bytes").and_then(Value::as_u64);
    Some(ArchiveEntry::new(date, path, bytes))
}
