use crate::Result;
use crawlview_types::{ArchiveEntry, RepoSelector};
use url::Url;

pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "data";
pub const DEFAULT_ROOT_SEGMENT: &str = "data";

pub const LATEST_DATASET_PATH: &str = "latest/urls.jsonl";
pub const LATEST_SUMMARY_PATH: &str = "latest/summary.json";
pub const ARCHIVE_INDEX_PATH: &str = "archive/index.json";

/// Where a published dataset lives: raw file root plus the tree API of the
/// same repository and branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    repo: RepoSelector,
    branch: String,
    root: Url,
    api_base: Url,
    root_segment: String,
}

impl DatasetLocation {
    pub fn new(repo: RepoSelector, branch: &str, raw_base: &str, api_base: &str) -> Result<Self> {
        let root = Url::parse(&format!(
            "{}/{}/{}/{}/",
            raw_base.trim_end_matches('/'),
            repo.owner(),
            repo.repo(),
            branch
        ))?;
        let api_base = Url::parse(&format!("{}/", api_base.trim_end_matches('/')))?;

        Ok(Self {
            repo,
            branch: branch.to_string(),
            root,
            api_base,
            root_segment: DEFAULT_ROOT_SEGMENT.to_string(),
        })
    }

    pub fn with_defaults(repo: RepoSelector) -> Result<Self> {
        Self::new(repo, DEFAULT_BRANCH, DEFAULT_RAW_BASE, DEFAULT_API_BASE)
    }

    pub fn repo(&self) -> &RepoSelector {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Dataset root, always ending in `/`
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Leading path segment stripped from archive paths (`data` by default)
    pub fn root_segment(&self) -> &str {
        &self.root_segment
    }

    /// Resolve a root-relative path
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.root.join(path.trim_start_matches('/'))?)
    }

    pub fn latest_url(&self) -> Result<Url> {
        self.resolve(LATEST_DATASET_PATH)
    }

    pub fn summary_url(&self) -> Result<Url> {
        self.resolve(LATEST_SUMMARY_PATH)
    }

    pub fn archive_index_url(&self) -> Result<Url> {
        self.resolve(ARCHIVE_INDEX_PATH)
    }

    pub fn archive_url(&self, entry: &ArchiveEntry) -> Result<Url> {
        self.resolve(&entry.path)
    }

    /// `repos/{owner}/{repo}/{tail}` under the API base
    pub fn api_url(&self, tail: &str) -> Result<Url> {
        Ok(self.api_base.join(&format!(
            "repos/{}/{}/{}",
            self.repo.owner(),
            self.repo.repo(),
            tail.trim_start_matches('/')
        ))?)
    }

    /// Strip leading `/` and the dataset-root segment from a repository path
    pub fn strip_root<'a>(&self, path: &'a str) -> &'a str {
        let path = path.trim_start_matches('/');
        match path
            .strip_prefix(self.root_segment.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(rest) => rest.trim_start_matches('/'),
            None => path,
        }
    }
}
