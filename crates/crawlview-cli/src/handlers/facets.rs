use super::load_session;
use crate::args::SourceArgs;
use crate::context::ExecutionContext;
use crate::presentation::{Style, cell, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_index::Facet;
use serde::Serialize;

#[derive(Serialize)]
struct FacetsOutput<'a> {
    status: &'a str,
    total: usize,
    sources: &'a [Facet],
    domains: &'a [Facet],
}

pub async fn handle(ctx: &ExecutionContext, source: &SourceArgs) -> Result<()> {
    let session = load_session(ctx, source).await?;
    let store = session.store();

    match ctx.format {
        OutputFormat::Json => print_json(&FacetsOutput {
            status: session.status(),
            total: store.len(),
            sources: store.source_facets(),
            domains: store.domain_facets(),
        }),
        OutputFormat::Plain => {
            let style = Style::detect();
            println!("{}", style.dim(session.status()));
            print_section("Sources", store.source_facets(), style);
            print_section("Domains", store.domain_facets(), style);
            Ok(())
        }
    }
}

fn print_section(title: &str, facets: &[Facet], style: Style) {
    println!();
    println!("{}", style.heading(&format!("{} ({})", title, facets.len())));
    if facets.is_empty() {
        println!("  {}", style.dim("(none)"));
        return;
    }
    let width = facets
        .iter()
        .map(|f| f.value.chars().count())
        .max()
        .unwrap_or(0)
        .min(48);
    for facet in facets {
        println!("  {}  {:>7}", cell(&facet.value, width), facet.count);
    }
}
