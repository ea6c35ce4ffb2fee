use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use anyhow::Result;
use crawlview_runtime::SessionConfig;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = ExecutionContext::from_cli(&cli)?;

    let Some(command) = cli.command else {
        show_guidance(&ctx)?;
        return Ok(());
    };

    match command {
        Commands::Repo { command } => handlers::repo::handle(&ctx, command),

        Commands::Publish { command } => handlers::publish::handle(ctx.format, command),

        Commands::List { source, query } => {
            block_on(handlers::list::handle(&ctx, &source, &query))
        }

        Commands::Facets { source } => block_on(handlers::facets::handle(&ctx, &source)),

        Commands::Stats { source } => block_on(handlers::stats::handle(&ctx, &source)),

        Commands::Show {
            url,
            source,
            expand,
        } => block_on(handlers::show::handle(&ctx, &url, &source, expand)),

        Commands::Export {
            source,
            query,
            out,
            output,
        } => block_on(handlers::export::handle(&ctx, &source, &query, out, output)),

        Commands::Archives => block_on(handlers::archives::handle(&ctx)),
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

fn show_guidance(ctx: &ExecutionContext) -> Result<()> {
    println!("crawlview - crawled URL dataset viewer\n");
    println!("Data directory: {}", ctx.data_dir().display());

    let stored = SessionConfig::load_from(&ctx.session_config_path())
        .ok()
        .and_then(|c| c.repo);
    match stored {
        Some(repo) => println!("Repository: {} (stored)\n", repo),
        None => {
            println!("No repository stored; the default is used unless --repo is given.");
            println!("  crawlview repo set <owner/repo>\n");
        }
    }

    println!("Browse the latest snapshot:");
    println!("  crawlview list --search <text> --sort name");
    println!("  crawlview facets");
    println!("  crawlview show <url>");
    println!("  crawlview stats\n");
    println!("Historical snapshots:");
    println!("  crawlview archives");
    println!("  crawlview list --archive YYYY-MM-DD\n");
    println!("Export the current view to CSV:");
    println!("  crawlview export --source <source> --out <dir>");
    Ok(())
}
