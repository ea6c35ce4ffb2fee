//! TestWorld pattern for declarative integration test setup.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would otherwise leak the developer's setup into tests
const ISOLATED_ENV: [&str; 3] = ["CRAWLVIEW_PATH", "CRAWLVIEW_SITE_URL", "RUST_LOG"];

/// Isolated test environment.
///
/// # Example
/// ```no_run
/// use crawlview_testing::{TestWorld, fixtures};
///
/// let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
/// let result = world.run(&["list", "--file", "urls.jsonl"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".crawlview");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Temp root; also the working directory of every command
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a file relative to the temp root, creating parent directories
    pub fn with_dataset(self, relative: &str, content: &str) -> Self {
        self.write_file(relative, content)
            .expect("Failed to write dataset");
        self
    }

    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_file(&self, relative: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path(relative))?)
    }

    /// Configure a CLI command with this environment's data dir, cwd and env
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.root());

        for key in ISOLATED_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    #[allow(deprecated)]
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("crawlview")
            .map_err(|e| anyhow::anyhow!("Failed to find crawlview binary: {}", e))?;
        self.configure_command(&mut cmd);
        Ok(cmd)
    }

    /// Run `crawlview` with `args` and capture its output
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = self.command()?;
        cmd.args(args);
        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run with `--format json` and parse stdout
    pub fn run_json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let result = self.run(&full)?;
        if !result.success() {
            anyhow::bail!("crawlview {:?} failed: {}", args, result.stderr);
        }
        result.json()
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
