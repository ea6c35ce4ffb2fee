use crate::line_reader::LineReader;
use crate::normalize::normalize_line;
use crate::Result;
use crawlview_index::RecordStore;
use futures::{Stream, StreamExt};

/// Lines processed between progress reports and cooperative yields
pub const PROGRESS_EVERY_LINES: usize = 1000;

/// Snapshot of an in-flight load, handed to the progress callback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub lines: usize,
    pub records: usize,
    pub parse_errors: usize,
    pub bytes_read: u64,
    pub total_bytes: Option<u64>,
}

impl LoadProgress {
    /// Percent of the declared length consumed, when the length is known
    pub fn percent(&self) -> Option<u8> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                let pct = (self.bytes_read.saturating_mul(100) / total).min(100);
                Some(pct as u8)
            }
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self.percent() {
            Some(pct) => format!("Loading… {}% ({} records)", pct, self.records),
            None => format!(
                "Loading… {} lines ({} bytes)",
                self.lines, self.bytes_read
            ),
        }
    }
}

/// Totals of a completed load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: usize,
    pub records: usize,
    pub parse_errors: usize,
    pub bytes_read: u64,
}

/// Decode a JSONL byte stream into `store`.
///
/// Lines are appended in file order. Malformed lines are counted on the
/// store and skipped. Every [`PROGRESS_EVERY_LINES`] lines the progress
/// callback runs and the task yields to the runtime; neither affects what
/// ends up in the store. Facets are rebuilt once, after the stream ends.
///
/// A read error from the stream aborts the load and is returned as-is; the
/// caller decides what to do with the partially filled store.
pub async fn ingest_stream<S, B, F>(
    mut stream: S,
    total_bytes: Option<u64>,
    store: &mut RecordStore,
    mut on_progress: F,
) -> Result<LoadStats>
where
    S: Stream<Item = std::io::Result<B>> + Unpin,
    B: AsRef<[u8]>,
    F: FnMut(&LoadProgress),
{
    let mut reader = LineReader::new();
    let mut progress = LoadProgress {
        total_bytes,
        ..LoadProgress::default()
    };

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let bytes = chunk.as_ref();
        progress.bytes_read += bytes.len() as u64;

        for line in reader.push(bytes) {
            if !ingest_line(&line, store, &mut progress) {
                continue;
            }
            if progress.lines % PROGRESS_EVERY_LINES == 0 {
                on_progress(&progress);
                tokio::task::yield_now().await;
            }
        }
    }

    if let Some(line) = reader.finish() {
        ingest_line(&line, store, &mut progress);
    }

    store.finish_load();
    on_progress(&progress);

    tracing::debug!(
        lines = progress.lines,
        records = progress.records,
        parse_errors = progress.parse_errors,
        bytes = progress.bytes_read,
        "dataset stream consumed"
    );

    Ok(LoadStats {
        lines: progress.lines,
        records: progress.records,
        parse_errors: progress.parse_errors,
        bytes_read: progress.bytes_read,
    })
}

/// Returns false for blank lines, which are not counted at all
fn ingest_line(line: &str, store: &mut RecordStore, progress: &mut LoadProgress) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    progress.lines += 1;
    match normalize_line(trimmed) {
        Ok(record) => {
            store.push(record);
            progress.records += 1;
        }
        Err(kind) => {
            if progress.parse_errors < 5 {
                tracing::debug!(line = progress.lines, %kind, "skipping malformed line");
            }
            store.record_parse_error(progress.lines, kind, trimmed);
            progress.parse_errors += 1;
        }
    }
    true
}
