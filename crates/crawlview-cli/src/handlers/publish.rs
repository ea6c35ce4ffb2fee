use crate::args::PublishCommand;
use crate::presentation::{Style, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_runtime::{rotate_latest, write_archive_index};
use serde_json::json;
use std::path::Path;

pub fn handle(format: OutputFormat, command: PublishCommand) -> Result<()> {
    match command {
        PublishCommand::Rotate {
            data_root,
            run_date,
        } => rotate(format, &data_root, run_date.as_deref()),
        PublishCommand::Index { data_root } => index(format, &data_root),
    }
}

fn rotate(format: OutputFormat, data_root: &Path, run_date: Option<&str>) -> Result<()> {
    let result = rotate_latest(data_root, run_date)?;

    if format == OutputFormat::Json {
        return print_json(&result);
    }

    let style = Style::detect();
    match (&result.archived_path, result.archived) {
        (Some(path), true) => println!("{} {}", style.success("Archived latest to"), path.display()),
        (Some(path), false) => println!(
            "{} {}; latest left in place",
            style.notice("Archive already exists:"),
            path.display()
        ),
        (None, _) => println!("No latest dataset to rotate"),
    }
    Ok(())
}

fn index(format: OutputFormat, data_root: &Path) -> Result<()> {
    let (path, index) = write_archive_index(data_root)?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "path": path,
            "archives": index.archives.len(),
            "generated_at_utc": index.generated_at_utc,
        })),
        OutputFormat::Plain => {
            println!(
                "{} {} ({} archive(s))",
                Style::detect().success("Wrote"),
                path.display(),
                index.archives.len()
            );
            Ok(())
        }
    }
}
