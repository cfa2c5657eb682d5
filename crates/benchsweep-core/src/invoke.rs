//! External process invocation.
//!
//! All subprocesses run through [`run_command`]: piped stdio, blocking wait,
//! optional timeout. Non-zero exit is not an error at this layer — callers
//! decide whether it is fatal.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{BenchmarkConfig, SweepConfig};
use crate::error::{Result, SweepError};

/// Captured result of one subprocess execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success, -1 if terminated by signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the process exited successfully.
    pub success: bool,
}

impl CommandOutput {
    /// Combined stdout followed by stderr, as a single text blob.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }
}

/// Run one command to completion, capturing stdout and stderr.
///
/// `timeout_secs == 0` waits indefinitely.
pub async fn run_command(argv: &[String], timeout_secs: u64) -> Result<CommandOutput> {
    let start = Instant::now();

    let (exe, args) = argv.split_first().ok_or(SweepError::EmptyCommand)?;

    let child = Command::new(exe)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let output = if timeout_secs > 0 {
        tokio::time::timeout(
            std::time::Duration::from_secs(timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| SweepError::Timeout {
            command: argv.join(" "),
            timeout_secs,
        })??
    } else {
        child.wait_with_output().await?
    };

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
        success: output.status.success(),
    })
}

/// Trait for benchmark runner backends, so tests can substitute fakes.
#[async_trait]
pub trait BenchmarkRunner: Send + Sync {
    /// Invoke the benchmark for the given sweep. Returns the raw process
    /// output; the caller turns a failed exit into a fatal error.
    async fn run(&self, config: &SweepConfig) -> Result<CommandOutput>;
}

/// Benchmark runner backed by the external benchmark process.
#[derive(Debug, Clone, Default)]
pub struct ProcessBenchmarkRunner {
    /// How the benchmark program is launched.
    pub benchmark: BenchmarkConfig,
}

impl ProcessBenchmarkRunner {
    /// Create a runner from an explicit benchmark configuration.
    pub fn new(benchmark: BenchmarkConfig) -> Self {
        Self { benchmark }
    }
}

#[async_trait]
impl BenchmarkRunner for ProcessBenchmarkRunner {
    async fn run(&self, config: &SweepConfig) -> Result<CommandOutput> {
        let argv = self.benchmark.command(config);
        run_command(&argv, self.benchmark.timeout_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_simple_command() {
        let out = run_command(&argv(&["echo", "hello"]), 0).await.unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_run_failing_command() {
        let out = run_command(&argv(&["false"]), 0).await.unwrap();
        assert!(!out.success);
        assert_ne!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let err = run_command(&[], 0).await.unwrap_err();
        match err {
            SweepError::EmptyCommand => {}
            other => panic!("expected EmptyCommand, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        let err = run_command(&argv(&["sleep", "5"]), 1).await.unwrap_err();
        match err {
            SweepError::Timeout { timeout_secs, .. } => assert_eq!(timeout_secs, 1),
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stderr_captured() {
        let out = run_command(&argv(&["sh", "-c", "echo oops >&2"]), 0)
            .await
            .unwrap();
        assert!(out.success);
        assert!(out.stderr.contains("oops"));
        assert!(out.combined().contains("oops"));
    }
}
