// crawlview front end
//
// Every command loads one snapshot into a fresh Session, applies the query
// flags, and prints a single view of it. Nothing is cached between runs
// except the repository selector in session.toml.

mod args;
mod commands;
pub mod context;
mod handlers;
mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands, PublishCommand, QueryArgs, RepoCommand, SourceArgs};
pub use commands::run;
pub use logging::init_logging;
