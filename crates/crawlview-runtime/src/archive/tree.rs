use super::{ArchiveStrategy, Discovery};
use crate::fetch::Fetcher;
use crate::location::DatasetLocation;
use crate::{Error, Result};
use async_trait::async_trait;
use crawlview_types::{ArchiveEntry, is_archive_date, sort_newest_first};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static ARCHIVE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^archive/(\d{4})/(\d{2})/(\d{2})/urls\.jsonl$").expect("valid archive path regex")
});

/// Tier 2: branch head -> commit -> recursive tree, keeping dated
/// `archive/YYYY/MM/DD/urls.jsonl` blobs.
pub struct TreeWalkStrategy {
    fetcher: Arc<dyn Fetcher>,
    location: DatasetLocation,
}

impl TreeWalkStrategy {
    pub fn new(fetcher: Arc<dyn Fetcher>, location: DatasetLocation) -> Self {
        Self { fetcher, location }
    }

    async fn walk(&self) -> Result<Vec<ArchiveEntry>> {
        let head_url = self
            .location
            .api_url(&format!("git/ref/heads/{}", self.location.branch()))?;
        let head = self.fetcher.get_json(&head_url).await?;
        let commit_sha = string_at(&head, "/object/sha")?;

        let commit_url = self.location.api_url(&format!("git/commits/{}", commit_sha))?;
        let commit = self.fetcher.get_json(&commit_url).await?;
        let tree_sha = string_at(&commit, "/tree/sha")?;

        let mut tree_url = self.location.api_url(&format!("git/trees/{}", tree_sha))?;
        tree_url.set_query(Some("recursive=1"));
        let tree = self.fetcher.get_json(&tree_url).await?;

        match tree.get("tree") {
            Some(Value::Array(items)) => {
                if tree.get("truncated").and_then(Value::as_bool) == Some(true) {
                    tracing::warn!("repository tree listing is truncated; archive list may be incomplete");
                }
                Ok(archive_entries_from_tree(items))
            }
            _ => Err(Error::UnexpectedDocument(
                "tree response has no `tree` list".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ArchiveStrategy for TreeWalkStrategy {
    fn name(&self) -> &'static str {
        "tree"
    }

    async fn discover(&self) -> Discovery {
        match self.walk().await {
            Ok(entries) => Discovery::Found(entries),
            Err(err) => Discovery::Unavailable(err.to_string()),
        }
    }
}

fn string_at<'a>(document: &'a Value, pointer: &str) -> Result<&'a str> {
    document
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::UnexpectedDocument(format!("missing `{}`", pointer)))
}

/// Dated archive blobs from a recursive tree listing, newest first.
///
/// Tree paths are branch-relative, which is also what the raw root resolves
/// against, so they are matched as-is.
pub fn archive_entries_from_tree(items: &[Value]) -> Vec<ArchiveEntry> {
    let mut entries: Vec<ArchiveEntry> = items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("blob"))
        .filter_map(|item| {
            let path = item.get("path")?.as_str()?;
            let caps = ARCHIVE_PATH.captures(path)?;
            let date = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
            if !is_archive_date(&date) {
                return None;
            }
            let bytes = item.get("size").and_then(Value::as_u64);
            Some(ArchiveEntry::new(date, path, bytes))
        })
        .collect();
    sort_newest_first(&mut entries);
    entries
}
