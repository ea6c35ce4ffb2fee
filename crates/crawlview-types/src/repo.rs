use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated `owner/repo` pair naming the repository that publishes the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSelector {
    owner: String,
    repo: String,
}

impl RepoSelector {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> crate::Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if !is_valid_segment(&owner) || !is_valid_segment(&repo) {
            return Err(Error::InvalidRepo(format!("{}/{}", owner, repo)));
        }
        Ok(Self { owner, repo })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Infer the selector from a GitHub Pages location such as
    /// `https://owner.github.io/repo/index.html`.
    pub fn from_pages_url(location: &str) -> Option<Self> {
        let parsed = url::Url::parse(location.trim()).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        let owner = host.strip_suffix(".github.io")?;
        let repo = parsed
            .path_segments()?
            .find(|segment| !segment.is_empty())?;
        Self::new(owner, repo).ok()
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepoSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        match trimmed.split_once('/') {
            Some((owner, repo)) if !repo.contains('/') => Self::new(owner, repo),
            _ => Err(Error::InvalidRepo(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepoSelector {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoSelector> for String {
    fn from(value: RepoSelector) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RepoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
