use super::load_session;
use crate::args::SourceArgs;
use crate::context::ExecutionContext;
use crate::presentation::{Style, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_engine::{DetailRow, DetailValue};
use serde::Serialize;

#[derive(Serialize)]
struct ShowOutput<'a> {
    url: &'a str,
    rows: &'a [DetailRow],
}

pub async fn handle(
    ctx: &ExecutionContext,
    url: &str,
    source: &SourceArgs,
    expand: bool,
) -> Result<()> {
    let session = load_session(ctx, source).await?;
    let config = ctx.viewer_config().await?;
    let rows = session.detail(url.trim(), &config)?;

    match ctx.format {
        OutputFormat::Json => print_json(&ShowOutput { url, rows: &rows }),
        OutputFormat::Plain => {
            render(&rows, expand, Style::detect());
            Ok(())
        }
    }
}

fn render(rows: &[DetailRow], expand: bool, style: Style) {
    let width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);
    let indent = " ".repeat(width + 2);

    for row in rows {
        let label = style.heading(&format!("{:<width$}", row.label, width = width));
        match &row.value {
            DetailValue::Text { text } => println!("{}  {}", label, text),
            DetailValue::Link { href } => println!("{}  {}", label, style.link(href)),
            DetailValue::Lines { shown, collapsed } => {
                let mut lines = shown.iter();
                match lines.next() {
                    Some(first) => println!("{}  {}", label, first),
                    None => println!("{}", label),
                }
                for line in lines {
                    println!("{}{}", indent, line);
                }
                if collapsed.is_empty() {
                    continue;
                }
                if expand {
                    for line in collapsed {
                        println!("{}{}", indent, line);
                    }
                } else {
                    println!(
                        "{}{}",
                        indent,
                        style.dim(&format!("+{} more (use --expand)", collapsed.len()))
                    );
                }
            }
        }
    }
}
