use crate::args::Cli;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use crawlview_runtime::{
    ArchiveListing, ArchiveResolver, DatasetLocation, Fetcher, HttpClient, RepoOrigin,
    SessionConfig, load_viewer_config, resolve_data_dir, resolve_repo,
};
use crawlview_types::{RepoSelector, ViewerConfig};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command may need, built lazily from the global flags
pub struct ExecutionContext {
    data_dir: PathBuf,
    pub format: OutputFormat,
    repo_flag: Option<String>,
    branch: String,
    raw_base: String,
    api_base: String,
    site_url: Option<String>,
    viewer_config_source: Option<String>,
    session_config: OnceCell<SessionConfig>,
    repo: OnceCell<(RepoSelector, RepoOrigin)>,
    location: OnceCell<DatasetLocation>,
    fetcher: OnceCell<Arc<HttpClient>>,
}

impl ExecutionContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

        Ok(Self {
            data_dir,
            format: cli.format,
            repo_flag: cli.repo.clone(),
            branch: cli.branch.clone(),
            raw_base: cli.raw_base.clone(),
            api_base: cli.api_base.clone(),
            site_url: cli.site_url.clone(),
            viewer_config_source: cli.viewer_config.clone(),
            session_config: OnceCell::new(),
            repo: OnceCell::new(),
            location: OnceCell::new(),
            fetcher: OnceCell::new(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_config_path(&self) -> PathBuf {
        SessionConfig::path_in(&self.data_dir)
    }

    pub fn session_config(&self) -> Result<&SessionConfig> {
        self.session_config.get_or_try_init(|| {
            let path = self.session_config_path();
            SessionConfig::load_from(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
        })
    }

    /// Effective repository: `--repo`, then stored, then `--site-url`, then default
    pub fn repo(&self) -> Result<&(RepoSelector, RepoOrigin)> {
        self.repo.get_or_try_init(|| {
            let stored = self.session_config()?.repo.as_ref();
            let resolved = resolve_repo(
                self.repo_flag.as_deref(),
                stored,
                self.site_url.as_deref(),
            )?;
            tracing::debug!(repo = %resolved.0, origin = %resolved.1, "repository selected");
            Ok(resolved)
        })
    }

    pub fn location(&self) -> Result<&DatasetLocation> {
        self.location.get_or_try_init(|| {
            let (repo, _) = self.repo()?;
            let location =
                DatasetLocation::new(repo.clone(), &self.branch, &self.raw_base, &self.api_base)?;
            Ok(location)
        })
    }

    pub fn fetcher(&self) -> Result<Arc<HttpClient>> {
        let client = self
            .fetcher
            .get_or_try_init(|| HttpClient::new().map(Arc::new))?;
        Ok(Arc::clone(client))
    }

    /// Resolve the archive list; every call starts again from the index document
    pub async fn archives(&self) -> Result<ArchiveListing> {
        let fetcher: Arc<dyn Fetcher> = self.fetcher()?;
        let resolver = ArchiveResolver::for_location(fetcher, self.location()?);
        Ok(resolver.resolve().await)
    }

    pub async fn viewer_config(&self) -> Result<ViewerConfig> {
        let fetcher = self.fetcher()?;
        Ok(load_viewer_config(
            self.viewer_config_source.as_deref(),
            &self.data_dir,
            fetcher.as_ref(),
        )
        .await)
    }
}
