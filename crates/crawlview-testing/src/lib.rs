//! Testing infrastructure for crawlview integration tests.
//!
//! - `TestWorld`: isolated data directory plus CLI execution
//! - `fixtures`: JSONL datasets and publisher directory layouts
//! - `assertions`: checks against `--format json` output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
