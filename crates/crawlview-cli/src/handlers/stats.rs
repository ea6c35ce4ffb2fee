use super::load_session;
use crate::args::SourceArgs;
use crate::context::ExecutionContext;
use crate::presentation::{Style, cell, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_index::{DatasetStats, QualityCounts, SourceStats};
use serde::Serialize;

#[derive(Serialize)]
struct StatsOutput<'a> {
    status: &'a str,
    #[serde(flatten)]
    stats: &'a DatasetStats,
}

pub async fn handle(ctx: &ExecutionContext, source: &SourceArgs) -> Result<()> {
    let session = load_session(ctx, source).await?;
    let stats = DatasetStats::from_store(session.store());

    match ctx.format {
        OutputFormat::Json => print_json(&StatsOutput {
            status: session.status(),
            stats: &stats,
        }),
        OutputFormat::Plain => {
            let style = Style::detect();
            println!("{}", style.dim(session.status()));
            print_totals(&stats.total, style);
            print_sources(&stats.sources, style);
            print_skipped(&stats, style);
            Ok(())
        }
    }
}

fn print_totals(total: &QualityCounts, style: Style) {
    println!();
    println!("{}", style.heading("Totals"));
    let rows = [
        ("records", total.records),
        ("unique URLs", total.unique_urls),
        ("duplicate URL hits", total.duplicate_url_hits),
        ("missing URL", total.missing_url),
        ("missing name", total.missing_name),
        ("missing meta", total.missing_meta),
        ("undated", total.undated),
    ];
    for (label, value) in rows {
        println!("  {:<20}{}", label, value);
    }
    match (&total.first_discovered, &total.last_discovered) {
        (Some(first), Some(last)) => println!("  {:<20}{} .. {}", "discovered", first, last),
        _ => println!("  {:<20}{}", "discovered", style.dim("(no timestamps)")),
    }
}

fn print_sources(sources: &[SourceStats], style: Style) {
    println!();
    println!("{}", style.heading(&format!("Sources ({})", sources.len())));
    if sources.is_empty() {
        println!("  {}", style.dim("(none)"));
        return;
    }

    let width = sources
        .iter()
        .map(|s| s.source.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("SOURCE".len(), 32);
    println!(
        "  {}",
        style.dim(&format!(
            "{}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}",
            cell("SOURCE", width),
            "RECORDS",
            "UNIQUE",
            "DUPES",
            "NO NAME",
            "NO META",
            "UNDATED"
        ))
    );
    for s in sources {
        let c = &s.counts;
        println!(
            "  {}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}",
            cell(&s.source, width),
            c.records,
            c.unique_urls,
            c.duplicate_url_hits,
            c.missing_name,
            c.missing_meta,
            c.undated
        );
    }
}

fn print_skipped(stats: &DatasetStats, style: Style) {
    println!();
    if stats.skipped_lines == 0 {
        println!("{}", style.success("No skipped lines"));
        return;
    }
    println!(
        "{}",
        style.notice(&format!(
            "Skipped lines: {} (invalid JSON: {}, not an object: {})",
            stats.skipped_lines, stats.invalid_json, stats.not_an_object
        ))
    );
    for sample in &stats.malformed_samples {
        println!(
            "  line {:>6}  {:<13}  {}",
            sample.line,
            sample.kind.to_string(),
            style.dim(&sample.excerpt)
        );
    }
    if stats.malformed_samples.len() < stats.skipped_lines {
        println!(
            "  {}",
            style.dim(&format!(
                "… {} more",
                stats.skipped_lines - stats.malformed_samples.len()
            ))
        );
    }
}
