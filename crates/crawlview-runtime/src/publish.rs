//! Publisher-side helpers for the data branch layout:
//!
//! ```text
//! <data_root>/latest/urls.jsonl
//! <data_root>/archive/YYYY/MM/DD/urls.jsonl
//! <data_root>/archive/index.json
//! ```

use crate::location::{ARCHIVE_INDEX_PATH, LATEST_DATASET_PATH};
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use crawlview_types::{ArchiveEntry, is_archive_date, sort_newest_first};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationResult {
    /// Whether the latest file was moved
    pub archived: bool,
    /// Archive file for the run date, when one exists after rotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_path: Option<PathBuf>,
}

/// Move `latest/urls.jsonl` into `archive/YYYY/MM/DD/urls.jsonl`.
///
/// No latest file is a no-op. An existing archive for the same day is never
/// overwritten; the latest file stays where it is.
pub fn rotate_latest(data_root: &Path, run_date: Option<&str>) -> Result<RotationResult> {
    let latest = data_root.join(LATEST_DATASET_PATH);
    if !latest.exists() {
        return Ok(RotationResult {
            archived: false,
            archived_path: None,
        });
    }

    let run_date = match run_date {
        Some(date) => date.trim().to_string(),
        None => Utc::now().format("%Y-%m-%d").to_string(),
    };
    if !is_archive_date(&run_date) {
        return Err(Error::InvalidOperation(format!(
            "run date must be YYYY-MM-DD, got {:?}",
            run_date
        )));
    }

    let archive_dir = data_root
        .join("archive")
        .join(&run_date[0..4])
        .join(&run_date[5..7])
        .join(&run_date[8..10]);
    let archived_path = archive_dir.join("urls.jsonl");

    if archived_path.exists() {
        tracing::info!(path = %archived_path.display(), "archive for run date already exists; keeping latest");
        return Ok(RotationResult {
            archived: false,
            archived_path: Some(archived_path),
        });
    }

    std::fs::create_dir_all(&archive_dir)?;
    std::fs::rename(&latest, &archived_path)?;
    tracing::info!(from = %latest.display(), to = %archived_path.display(), "rotated latest dataset");

    Ok(RotationResult {
        archived: true,
        archived_path: Some(archived_path),
    })
}

/// Document consumed by the index-document archive tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveIndex {
    pub generated_at_utc: String,
    pub archives: Vec<ArchiveEntry>,
}

/// Scan `archive/YYYY/MM/DD/urls.jsonl` under `data_root`, newest first
pub fn build_archive_index(data_root: &Path) -> Result<ArchiveIndex> {
    let archive_root = data_root.join("archive");
    let mut archives = Vec::new();

    if archive_root.is_dir() {
        for entry in WalkDir::new(&archive_root)
            .min_depth(4)
            .max_depth(4)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
            if !entry.file_type().is_file() || entry.file_name() != "urls.jsonl" {
                continue;
            }
            if let Some(archive) = archive_entry(data_root, entry.path())? {
                archives.push(archive);
            }
        }
    }

    sort_newest_first(&mut archives);
    Ok(ArchiveIndex {
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        archives,
    })
}

fn archive_entry(data_root: &Path, path: &Path) -> Result<Option<ArchiveEntry>> {
    let Ok(relative) = path.strip_prefix(data_root) else {
        return Ok(None);
    };
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    // archive / YYYY / MM / DD / urls.jsonl
    let [_, yyyy, mm, dd, _] = parts.as_slice() else {
        return Ok(None);
    };
    let date = format!("{}-{}-{}", yyyy, mm, dd);
    if !is_archive_date(&date) {
        tracing::debug!(path = %path.display(), "skipping archive with malformed date path");
        return Ok(None);
    }

    let bytes = std::fs::metadata(path)?.len();
    Ok(Some(ArchiveEntry::new(date, parts.join("/"), Some(bytes))))
}

/// Build and write `archive/index.json`; returns the written path and index
pub fn write_archive_index(data_root: &Path) -> Result<(PathBuf, ArchiveIndex)> {
    let index = build_archive_index(data_root)?;
    let out_path = data_root.join(ARCHIVE_INDEX_PATH);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(&index)?;
    content.push('\n');
    std::fs::write(&out_path, content)?;
    Ok((out_path, index))
}
