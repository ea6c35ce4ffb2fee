//! A viewing session: one record store, one query engine, one status line.
//!
//! Loads run in two halves. [`fetch_dataset`] builds a fresh store without
//! touching the session, so it can run while the user keeps browsing the
//! current one. [`Session::commit`] then swaps it in, but only if no newer
//! load has started since its [`LoadTicket`] was issued.

use crate::fetch::{Fetcher, OpenedStream, open_file_stream};
use crate::location::DatasetLocation;
use crate::{Error, Result};
use crawlview_engine::{
    DetailRow, ExportError, ExportTable, QueryEngine, QueryView, build_export_table,
    project_detail,
};
use crawlview_index::RecordStore;
use crawlview_ingest::{LoadProgress, LoadStats, ingest_stream};
use crawlview_types::{ArchiveEntry, RunSummary, ViewerConfig};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which snapshot a load reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Latest,
    Archive(ArchiveEntry),
    File(PathBuf),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Latest => write!(f, "latest"),
            DatasetSource::Archive(entry) => write!(f, "archive {}", entry.date),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Monotonic counter of started loads, shared by every ticket it issues
#[derive(Debug, Clone, Default)]
pub struct LoadGenerations {
    latest: Arc<AtomicU64>,
}

impl LoadGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load; every ticket issued before this one becomes stale
    pub fn begin(&self) -> LoadTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// A fully ingested dataset, not yet part of any session
#[derive(Debug)]
pub struct LoadedDataset {
    pub store: RecordStore,
    pub stats: LoadStats,
    pub summary: Option<RunSummary>,
}

/// What [`Session::commit`] did with a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// A newer load started after this one; its result was dropped
    Stale,
}

/// Open `source` and stream it into a new store.
///
/// For the latest snapshot the run summary is fetched as well; it is best
/// effort and never fails the load.
pub async fn fetch_dataset<F>(
    fetcher: &dyn Fetcher,
    location: &DatasetLocation,
    source: &DatasetSource,
    on_progress: F,
) -> Result<LoadedDataset>
where
    F: FnMut(&LoadProgress),
{
    let OpenedStream {
        stream,
        total_bytes,
    } = match source {
        DatasetSource::Latest => fetcher.get_stream(&location.latest_url()?).await?,
        DatasetSource::Archive(entry) => fetcher.get_stream(&location.archive_url(entry)?).await?,
        DatasetSource::File(path) => open_file_stream(path).await?,
    };

    let mut store = RecordStore::new();
    let stats = ingest_stream(stream, total_bytes, &mut store, on_progress).await?;

    let summary = match source {
        DatasetSource::Latest => fetch_run_summary(fetcher, location).await,
        _ => None,
    };

    Ok(LoadedDataset {
        store,
        stats,
        summary,
    })
}

/// `latest/summary.json`, or `None` on any failure
pub async fn fetch_run_summary(
    fetcher: &dyn Fetcher,
    location: &DatasetLocation,
) -> Option<RunSummary> {
    let url = location.summary_url().ok()?;
    match fetcher.get_json(&url).await {
        Ok(value) => RunSummary::from_value(value),
        Err(err) => {
            tracing::debug!(error = %err, "run summary unavailable");
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    store: RecordStore,
    engine: QueryEngine,
    status: String,
    summary: Option<RunSummary>,
    source: Option<DatasetSource>,
    generations: LoadGenerations,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut QueryEngine {
        &mut self.engine
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Snapshot currently held in the store
    pub fn source(&self) -> Option<&DatasetSource> {
        self.source.as_ref()
    }

    pub fn generations(&self) -> &LoadGenerations {
        &self.generations
    }

    /// Issue a ticket for a new load; the current store stays visible
    pub fn begin_load(&mut self, source: &DatasetSource) -> LoadTicket {
        self.status = format!("Loading {}…", source);
        self.generations.begin()
    }

    /// Apply a finished load if `ticket` is still the newest one.
    ///
    /// A failed load clears the store so stale rows are never shown under a
    /// failure message, and the error is handed back to the caller.
    pub fn commit(
        &mut self,
        ticket: &LoadTicket,
        source: DatasetSource,
        result: Result<LoadedDataset>,
    ) -> Result<CommitOutcome> {
        if !ticket.is_current() {
            tracing::debug!(
                generation = ticket.generation(),
                current = self.generations.current(),
                "discarding stale load"
            );
            return Ok(CommitOutcome::Stale);
        }

        match result {
            Ok(loaded) => {
                self.store = loaded.store;
                self.summary = loaded.summary;
                self.source = Some(source);
                self.status = self.loaded_status();
                tracing::info!(
                    records = loaded.stats.records,
                    parse_errors = loaded.stats.parse_errors,
                    bytes = loaded.stats.bytes_read,
                    "dataset loaded"
                );
                Ok(CommitOutcome::Applied)
            }
            Err(err) => {
                self.store.clear();
                self.summary = None;
                self.source = None;
                self.status = format!("Failed to load dataset: {}", err);
                tracing::warn!(error = %err, "dataset load failed");
                Err(err)
            }
        }
    }

    /// Begin, fetch and commit in one step
    pub async fn load<F>(
        &mut self,
        fetcher: &dyn Fetcher,
        location: &DatasetLocation,
        source: DatasetSource,
        on_progress: F,
    ) -> Result<CommitOutcome>
    where
        F: FnMut(&LoadProgress),
    {
        let ticket = self.begin_load(&source);
        let result = fetch_dataset(fetcher, location, &source, on_progress).await;
        self.commit(&ticket, source, result)
    }

    fn loaded_status(&self) -> String {
        let mut status = self.store.status_text();
        if let Some(summary) = &self.summary {
            status.push_str(" · ");
            status.push_str(&summary.status_line());
        }
        status
    }

    /// Current page under the engine's state
    pub fn view(&mut self) -> QueryView<'_> {
        self.engine.execute(&self.store)
    }

    pub fn detail(&self, url: &str, config: &ViewerConfig) -> Result<Vec<DetailRow>> {
        let record = self
            .store
            .find_by_url(url)
            .ok_or_else(|| Error::InvalidOperation(format!("No record with URL {}", url)))?;
        Ok(project_detail(record, config))
    }

    pub fn export_table(&self) -> std::result::Result<ExportTable, ExportError> {
        build_export_table(&self.store, self.engine.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(urls: &[&str]) -> LoadedDataset {
        let mut store = RecordStore::new();
        for url in urls {
            store.push(crawlview_types::Record::new(*url, "", "", "s", None));
        }
        store.finish_load();
        LoadedDataset {
            stats: LoadStats {
                lines: urls.len(),
                records: urls.len(),
                ..LoadStats::default()
            },
            store,
            summary: None,
        }
    }

    #[test]
    fn test_tickets_go_stale_when_a_newer_load_begins() {
        let generations = LoadGenerations::new();
        let first = generations.begin();
        assert!(first.is_current());

        let second = generations.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_older_load_finishing_last_is_discarded() {
        let mut session = Session::new();
        let older = session.begin_load(&DatasetSource::Latest);
        let newer = session.begin_load(&DatasetSource::Latest);

        let outcome = session
            .commit(&newer, DatasetSource::Latest, Ok(loaded(&["https://new.hk/"])))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Applied);

        let outcome = session
            .commit(&older, DatasetSource::Latest, Ok(loaded(&["https://old.hk/a", "https://old.hk/b"])))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Stale);

        assert_eq!(session.store().len(), 1);
        assert!(session.store().find_by_url("https://new.hk/").is_some());
        assert_eq!(session.status(), "Loaded 1 record");
    }

    #[test]
    fn test_older_load_finishing_first_is_discarded() {
        let mut session = Session::new();
        let older = session.begin_load(&DatasetSource::Latest);
        let newer = session.begin_load(&DatasetSource::Latest);

        let outcome = session
            .commit(&older, DatasetSource::Latest, Ok(loaded(&["https://old.hk/"])))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(session.store().is_empty());

        session
            .commit(&newer, DatasetSource::Latest, Ok(loaded(&["https://new.hk/"])))
            .unwrap();
        assert!(session.store().find_by_url("https://new.hk/").is_some());
    }

    #[test]
    fn test_failed_load_clears_store() {
        let mut session = Session::new();
        let ticket = session.begin_load(&DatasetSource::Latest);
        session
            .commit(&ticket, DatasetSource::Latest, Ok(loaded(&["https://a.hk/"])))
            .unwrap();

        let ticket = session.begin_load(&DatasetSource::Latest);
        let err = session
            .commit(
                &ticket,
                DatasetSource::Latest,
                Err(Error::Status {
                    url: "https://raw.example/latest/urls.jsonl".to_string(),
                    status: 404,
                }),
            )
            .unwrap_err();

        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert!(session.store().is_empty());
        assert!(session.source().is_none());
        assert_eq!(
            session.status(),
            "Failed to load dataset: HTTP 404 for https://raw.example/latest/urls.jsonl"
        );
    }

    #[test]
    fn test_stale_failure_leaves_current_data_alone() {
        let mut session = Session::new();
        let older = session.begin_load(&DatasetSource::Latest);
        let newer = session.begin_load(&DatasetSource::Latest);
        session
            .commit(&newer, DatasetSource::Latest, Ok(loaded(&["https://a.hk/"])))
            .unwrap();

        let outcome = session
            .commit(
                &older,
                DatasetSource::Latest,
                Err(Error::InvalidOperation("network".to_string())),
            )
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Stale);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_status_includes_run_summary() {
        let mut session = Session::new();
        let ticket = session.begin_load(&DatasetSource::Latest);
        let mut dataset = loaded(&["https://a.hk/", "https://b.hk/"]);
        dataset.summary = Some(RunSummary {
            run_date_utc: "2024-01-02".to_string(),
            started_at_utc: None,
            rows: 2,
            crawler: String::new(),
        });
        session.commit(&ticket, DatasetSource::Latest, Ok(dataset)).unwrap();

        assert_eq!(
            session.status(),
            "Loaded 2 records · Run 2024-01-02 · 2 rows · crawler: all"
        );
    }
}
