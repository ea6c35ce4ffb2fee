use crate::args::{QueryArgs, SourceArgs};
use crate::context::ExecutionContext;
use crate::presentation::ProgressLine;
use crate::types::OutputFormat;
use anyhow::{Result, anyhow, bail};
use crawlview_engine::{QueryEngine, SortDirection};
use crawlview_runtime::{DatasetSource, Session};
use crawlview_types::is_archive_date;

/// Pick the snapshot named by `--file` / `--archive`, latest otherwise
pub async fn resolve_source(ctx: &ExecutionContext, args: &SourceArgs) -> Result<DatasetSource> {
    if let Some(path) = &args.file {
        return Ok(DatasetSource::File(path.clone()));
    }

    let Some(date) = args.archive.as_deref().map(str::trim) else {
        return Ok(DatasetSource::Latest);
    };
    if !is_archive_date(date) {
        bail!("Archive date must be YYYY-MM-DD, got '{}'", date);
    }

    let listing = ctx.archives().await?;
    let entry = listing.find(date).cloned().ok_or_else(|| {
        let hint = match listing.status.as_deref() {
            Some(status) => status.to_string(),
            None => format!("{} archive(s) available", listing.entries.len()),
        };
        anyhow!("No archive for {} ({}); run 'crawlview archives' to list dates", date, hint)
    })?;
    Ok(DatasetSource::Archive(entry))
}

/// Load the requested snapshot into a fresh session.
///
/// A failed load surfaces the session's status text as the error.
pub async fn load_session(ctx: &ExecutionContext, args: &SourceArgs) -> Result<Session> {
    let source = resolve_source(ctx, args).await?;
    let fetcher = ctx.fetcher()?;
    let location = ctx.location()?;

    let mut session = Session::new();
    let mut progress = ProgressLine::new(ctx.format == OutputFormat::Plain);
    let result = session
        .load(fetcher.as_ref(), location, source, |p| progress.report(p))
        .await;
    progress.finish();

    if result.is_err() {
        bail!("{}", session.status());
    }
    Ok(session)
}

/// Apply filter, sort and page flags in that order; sorting resets the page
pub fn apply_query(engine: &mut QueryEngine, args: &QueryArgs) {
    engine.set_source_filter(args.source.as_deref());
    engine.set_domain_filter(args.domain.as_deref());
    engine.set_search(args.search.as_deref().unwrap_or(""));

    let current = engine.state().sort_key();
    let key = args.sort.unwrap_or(current);
    let direction = if args.desc {
        SortDirection::Descending
    } else if args.asc {
        SortDirection::Ascending
    } else if key == current {
        engine.state().direction()
    } else {
        SortDirection::Ascending
    };
    engine.set_sort(key, direction);

    engine.set_page_size(args.page_size);
    engine.set_page(args.page);
}
