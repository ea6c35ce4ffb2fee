use crate::types::{LogLevel, OutputFormat};
use clap::{Args, Parser, Subcommand};
use crawlview_engine::SortKey;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crawlview")]
#[command(about = "Browse, filter and export crawled URL datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Defaults to $CRAWLVIEW_PATH, then the XDG data dir, then ~/.crawlview
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Repository publishing the dataset, as owner/repo
    #[arg(long, global = true)]
    pub repo: Option<String>,

    #[arg(long, default_value = crawlview_runtime::location::DEFAULT_BRANCH, global = true)]
    pub branch: String,

    #[arg(long, default_value = crawlview_runtime::location::DEFAULT_RAW_BASE, global = true)]
    pub raw_base: String,

    #[arg(long, default_value = crawlview_runtime::location::DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Hosting location used to infer the repository (owner.github.io/repo)
    #[arg(long, env = "CRAWLVIEW_SITE_URL", global = true)]
    pub site_url: Option<String>,

    /// Viewer configuration document (path or URL)
    #[arg(long, global = true)]
    pub viewer_config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page of records
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Distinct sources and domains with their counts
    Facets {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Data-quality report: duplicates, missing fields, skipped lines
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Detail view of the record with this URL
    Show {
        url: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print collapsed department lines too
        #[arg(long)]
        expand: bool,
    },

    /// Write every matching record (all pages) to a CSV file
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Directory for the timestamped export file
        #[arg(long, conflicts_with = "output")]
        out: Option<PathBuf>,

        /// Exact output file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List historical snapshots
    Archives,

    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// Maintain the published data branch layout
    Publish {
        #[command(subcommand)]
        command: PublishCommand,
    },
}

/// Which snapshot to load; the latest one when neither flag is given
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Local JSONL file
    #[arg(long, conflicts_with = "archive")]
    pub file: Option<PathBuf>,

    /// Archive date (YYYY-MM-DD)
    #[arg(long)]
    pub archive: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    #[arg(long)]
    pub source: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    /// Case-insensitive substring of name or URL
    #[arg(long)]
    pub search: Option<String>,

    /// discovered_at_utc, name, url, domain or source
    #[arg(long)]
    pub sort: Option<SortKey>,

    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    #[arg(long)]
    pub asc: bool,

    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long, default_value_t = crawlview_engine::query::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Subcommand)]
pub enum RepoCommand {
    /// Effective repository and where it came from
    Show,

    /// Remember a repository for later runs
    Set {
        #[arg(value_name = "OWNER/REPO")]
        selector: String,
    },

    /// Forget the remembered repository
    Clear,
}

#[derive(Subcommand)]
pub enum PublishCommand {
    /// Move latest/urls.jsonl into archive/YYYY/MM/DD/
    Rotate {
        #[arg(long)]
        data_root: PathBuf,

        /// Defaults to today (UTC)
        #[arg(long)]
        run_date: Option<String>,
    },

    /// Rebuild archive/index.json
    Index {
        #[arg(long)]
        data_root: PathBuf,
    },
}
