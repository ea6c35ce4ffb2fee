use crate::context::ExecutionContext;
use crate::presentation::{Style, format_bytes, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_runtime::{ArchiveListing, NO_ARCHIVES_STATUS};

pub async fn handle(ctx: &ExecutionContext) -> Result<()> {
    let listing = ctx.archives().await?;

    match ctx.format {
        OutputFormat::Json => print_json(&listing),
        OutputFormat::Plain => {
            render(&listing, Style::detect());
            Ok(())
        }
    }
}

fn render(listing: &ArchiveListing, style: Style) {
    if listing.is_empty() {
        let status = listing.status.as_deref().unwrap_or(NO_ARCHIVES_STATUS);
        println!("{}", style.notice(status));
        return;
    }

    let via = listing.tier.unwrap_or("unknown");
    println!(
        "{}",
        style.heading(&format!(
            "{} archive(s) {}",
            listing.entries.len(),
            style.dim(&format!("(via {})", via))
        ))
    );
    for entry in &listing.entries {
        let size = entry.bytes.map(format_bytes).unwrap_or_default();
        println!("  {}  {:>9}  {}", entry.date, size, style.dim(&entry.path));
    }
}
