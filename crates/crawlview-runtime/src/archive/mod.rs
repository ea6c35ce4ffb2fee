//! Historical snapshot discovery.
//!
//! An [`ArchiveResolver`] runs an ordered chain of [`ArchiveStrategy`]s and
//! takes the first one that finds anything it can vouch for. The default
//! chain is the published index document first, then a walk of the
//! repository tree. Every call to [`ArchiveResolver::resolve`] starts again
//! from the first strategy.

mod index;
mod tree;

pub use index::{IndexDocumentStrategy, parse_index_document};
pub use tree::{TreeWalkStrategy, archive_entries_from_tree};

use crate::fetch::Fetcher;
use crate::location::DatasetLocation;
use async_trait::async_trait;
use crawlview_types::ArchiveEntry;
use serde::Serialize;
use std::sync::Arc;

pub const NO_ARCHIVES_STATUS: &str = "No archives found";

/// Outcome of one discovery strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(Vec<ArchiveEntry>),
    Unavailable(String),
}

#[async_trait]
pub trait ArchiveStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn discover(&self) -> Discovery;
}

/// Archive list shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveListing {
    pub entries: Vec<ArchiveEntry>,
    /// Strategy that produced the entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
    /// Non-blocking notice for the status bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ArchiveListing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, date: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.date == date)
    }
}

pub struct ArchiveResolver {
    strategies: Vec<Box<dyn ArchiveStrategy>>,
}

impl ArchiveResolver {
    pub fn new(strategies: Vec<Box<dyn ArchiveStrategy>>) -> Self {
        Self { strategies }
    }

    /// Index document first, tree walk second
    pub fn for_location(fetcher: Arc<dyn Fetcher>, location: &DatasetLocation) -> Self {
        Self::new(vec![
            Box::new(IndexDocumentStrategy::new(fetcher.clone(), location.clone())),
            Box::new(TreeWalkStrategy::new(fetcher, location.clone())),
        ])
    }

    pub async fn resolve(&self) -> ArchiveListing {
        for strategy in &self.strategies {
            match strategy.discover().await {
                Discovery::Found(entries) => {
                    tracing::debug!(
                        tier = strategy.name(),
                        count = entries.len(),
                        "archive list resolved"
                    );
                    let status = entries.is_empty().then(|| NO_ARCHIVES_STATUS.to_string());
                    return ArchiveListing {
                        entries,
                        tier: Some(strategy.name()),
                        status,
                    };
                }
                Discovery::Unavailable(reason) => {
                    tracing::debug!(tier = strategy.name(), %reason, "archive tier unavailable");
                }
            }
        }

        ArchiveListing {
            entries: Vec::new(),
            tier: None,
            status: Some(NO_ARCHIVES_STATUS.to_string()),
        }
    }
}
