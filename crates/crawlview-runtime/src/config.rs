use crate::{Error, Result};
use crawlview_types::RepoSelector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "CRAWLVIEW_PATH";
pub const SESSION_FILE: &str = "session.toml";
pub const VIEWER_CONFIG_FILE: &str = "viewer_config.json";
pub const DEFAULT_REPO: &str = "hkgov-crawl/url-index";

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. CRAWLVIEW_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.crawlview
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV)
        && !env_path.trim().is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("crawlview"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".crawlview"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// The single persisted value: which repository publishes the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoSelector>,
}

impl SessionConfig {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SESSION_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Forget the stored selector; removing an absent file is not an error
    pub fn clear_at(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Where the effective repo selector came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoOrigin {
    Explicit,
    Stored,
    Hosting,
    Default,
}

impl fmt::Display for RepoOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepoOrigin::Explicit => "explicit",
            RepoOrigin::Stored => "stored",
            RepoOrigin::Hosting => "hosting location",
            RepoOrigin::Default => "default",
        };
        f.write_str(label)
    }
}

/// Pick the repo selector: explicit > stored > hosting location > default.
///
/// A malformed explicit value is an error rather than a silent fallback.
pub fn resolve_repo(
    explicit: Option<&str>,
    stored: Option<&RepoSelector>,
    site_url: Option<&str>,
) -> Result<(RepoSelector, RepoOrigin)> {
    if let Some(value) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok((value.parse()?, RepoOrigin::Explicit));
    }

    if let Some(repo) = stored {
        return Ok((repo.clone(), RepoOrigin::Stored));
    }

    if let Some(repo) = site_url.and_then(RepoSelector::from_pages_url) {
        return Ok((repo, RepoOrigin::Hosting));
    }

    Ok((DEFAULT_REPO.parse()?, RepoOrigin::Default))
}
