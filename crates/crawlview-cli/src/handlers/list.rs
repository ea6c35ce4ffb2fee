use super::{apply_query, load_session};
use crate::args::{QueryArgs, SourceArgs};
use crate::context::ExecutionContext;
use crate::presentation::{Style, cell, format_discovered, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_engine::{QueryView, SortDirection, SortKey};
use crawlview_types::Record;
use serde::Serialize;

#[derive(Serialize)]
struct ListOutput<'a> {
    status: &'a str,
    range: String,
    source: Option<&'a str>,
    domain: Option<&'a str>,
    search: &'a str,
    sort: SortKey,
    direction: SortDirection,
    page: usize,
    total_pages: usize,
    filtered_count: usize,
    total_count: usize,
    rows: &'a [&'a Record],
}

pub async fn handle(ctx: &ExecutionContext, source: &SourceArgs, query: &QueryArgs) -> Result<()> {
    let mut session = load_session(ctx, source).await?;
    apply_query(session.engine_mut(), query);

    let status = session.status().to_string();
    let state = session.engine().state().clone();
    let view = session.view();

    match ctx.format {
        OutputFormat::Json => print_json(&ListOutput {
            status: &status,
            range: view.range_text(),
            source: state.source(),
            domain: state.domain(),
            search: state.search(),
            sort: state.sort_key(),
            direction: state.direction(),
            page: view.page,
            total_pages: view.total_pages,
            filtered_count: view.filtered_count,
            total_count: view.total_count,
            rows: &view.rows,
        }),
        OutputFormat::Plain => {
            render(&view, &status, Style::detect());
            Ok(())
        }
    }
}

fn render(view: &QueryView<'_>, status: &str, style: Style) {
    println!("{}", style.dim(status));

    if view.is_empty() {
        println!("{}", view.range_text());
        return;
    }

    println!(
        "{}",
        style.heading(&format!(
            "{}  {}  {}  {}",
            cell("DISCOVERED", 16),
            cell("SOURCE", 22),
            cell("NAME", 40),
            "URL"
        ))
    );
    for record in &view.rows {
        println!(
            "{}  {}  {}  {}",
            cell(&format_discovered(record.discovered_at_utc()), 16),
            cell(record.source(), 22),
            cell(record.name(), 40),
            style.link(record.url())
        );
    }

    println!(
        "{}  {}",
        view.range_text(),
        style.dim(&format!("page {} of {}", view.page, view.total_pages))
    );
}
