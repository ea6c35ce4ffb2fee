use super::{apply_query, load_session};
use crate::args::{QueryArgs, SourceArgs};
use crate::context::ExecutionContext;
use crate::presentation::{Style, print_json};
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crawlview_engine::{export_csv, export_file_name};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize)]
struct ExportOutput<'a> {
    path: &'a Path,
    rows: usize,
    columns: &'a [String],
}

pub async fn handle(
    ctx: &ExecutionContext,
    source: &SourceArgs,
    query: &QueryArgs,
    out_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut session = load_session(ctx, source).await?;
    apply_query(session.engine_mut(), query);

    // Preconditions fail before any file is touched
    let table = session.export_table()?;
    let bytes = export_csv(&table)?;

    let path = output_path(out_dir, output, SystemTime::now());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.len(), "export written");

    match ctx.format {
        OutputFormat::Json => print_json(&ExportOutput {
            path: &path,
            rows: table.len(),
            columns: &table.headers,
        }),
        OutputFormat::Plain => {
            let style = Style::detect();
            println!(
                "{} {} record(s) to {}",
                style.success("Exported"),
                table.len(),
                path.display()
            );
            Ok(())
        }
    }
}

fn output_path(out_dir: Option<PathBuf>, output: Option<PathBuf>, now: SystemTime) -> PathBuf {
    match (output, out_dir) {
        (Some(file), _) => file,
        (None, Some(dir)) => dir.join(export_file_name(utc_clock(now))),
        (None, None) => PathBuf::from(export_file_name(utc_clock(now))),
    }
}

/// `None` for a wall clock set before the epoch or past chrono's range
fn utc_clock(now: SystemTime) -> Option<DateTime<Utc>> {
    let since = now.duration_since(UNIX_EPOCH).ok()?;
    let secs = i64::try_from(since.as_secs()).ok()?;
    DateTime::from_timestamp(secs, since.subsec_nanos())
}
