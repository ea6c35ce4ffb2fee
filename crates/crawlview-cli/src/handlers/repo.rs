use crate::args::RepoCommand;
use crate::context::ExecutionContext;
use crate::presentation::{Style, print_json};
use crate::types::OutputFormat;
use anyhow::Result;
use crawlview_runtime::SessionConfig;
use crawlview_types::RepoSelector;
use serde_json::json;

pub fn handle(ctx: &ExecutionContext, command: RepoCommand) -> Result<()> {
    match command {
        RepoCommand::Show => show(ctx),
        RepoCommand::Set { selector } => set(ctx, &selector),
        RepoCommand::Clear => clear(ctx),
    }
}

fn show(ctx: &ExecutionContext) -> Result<()> {
    let (repo, origin) = ctx.repo()?;
    let location = ctx.location()?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "repo": repo,
            "origin": origin,
            "branch": location.branch(),
            "root": location.root().as_str(),
        })),
        OutputFormat::Plain => {
            let style = Style::detect();
            println!("{} {}", style.heading(&repo.to_string()), style.dim(&format!("({})", origin)));
            println!("{}", style.link(location.root().as_str()));
            Ok(())
        }
    }
}

fn set(ctx: &ExecutionContext, selector: &str) -> Result<()> {
    let repo: RepoSelector = selector.parse()?;
    let path = ctx.session_config_path();
    let config = SessionConfig {
        repo: Some(repo.clone()),
    };
    config.save_to(&path)?;
    tracing::info!(repo = %repo, path = %path.display(), "repository stored");

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "repo": repo })),
        OutputFormat::Plain => {
            println!("{} {}", Style::detect().success("Repository set to"), repo);
            Ok(())
        }
    }
}

fn clear(ctx: &ExecutionContext) -> Result<()> {
    SessionConfig::clear_at(&ctx.session_config_path())?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "repo": null })),
        OutputFormat::Plain => {
            println!("Repository selection cleared");
            Ok(())
        }
    }
}
