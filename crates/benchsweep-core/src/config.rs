//! Resolved invocation parameters and derived filesystem layout.
//!
//! A [`SweepConfig`] is immutable once built: problem id, output directory,
//! model, and dataset, plus the report/error directories derived from them.
//! [`BenchmarkConfig`] describes how the external benchmark runner is
//! launched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::problem::ProblemId;

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Dataset used when the caller does not name one.
pub const DEFAULT_DATASET: &str =
    "dataset/cvdp_v1.0.2_nonagentic_code_generation_no_commercial.jsonl";

/// Resolved parameters for one sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    /// Problem to run and scan.
    pub problem_id: ProblemId,

    /// Destination directory passed to the benchmark runner.
    pub output_dir: PathBuf,

    /// Model name forwarded to the benchmark runner.
    pub model: String,

    /// Dataset path forwarded to the benchmark runner. Not checked for
    /// existence here; the runner owns that contract.
    pub dataset: String,
}

impl SweepConfig {
    /// Build a config, applying defaults for absent model/dataset.
    pub fn new(
        problem_id: ProblemId,
        output_dir: impl Into<PathBuf>,
        model: Option<String>,
        dataset: Option<String>,
    ) -> Self {
        Self {
            problem_id,
            output_dir: output_dir.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dataset: dataset.unwrap_or_else(|| DEFAULT_DATASET.to_string()),
        }
    }

    /// `<output_dir>/<dir_name>` — the benchmark's per-problem directory.
    pub fn problem_dir(&self) -> PathBuf {
        self.output_dir.join(self.problem_id.dir_name())
    }

    /// `<output_dir>/<dir_name>/reports` — consumed, never produced.
    pub fn report_dir(&self) -> PathBuf {
        self.problem_dir().join("reports")
    }

    /// `<output_dir>/<dir_name>/extracted_errors` — produced by the scan.
    pub fn error_dir(&self) -> PathBuf {
        self.problem_dir().join("extracted_errors")
    }
}

/// Configuration for the external benchmark runner process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    /// Path to the benchmark runner program.
    pub program: String,

    /// Timeout in seconds for the benchmark process. 0 disables the
    /// timeout, matching the historical behavior of waiting forever.
    pub timeout_secs: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            program: "./run_benchmark.py".to_string(),
            timeout_secs: 0,
        }
    }
}

impl BenchmarkConfig {
    /// Build the argv for one benchmark invocation: dataset, listing mode,
    /// model, problem-id filter, and destination directory.
    pub fn command(&self, config: &SweepConfig) -> Vec<String> {
        vec![
            self.program.clone(),
            "-d".to_string(),
            config.dataset.clone(),
            "-l".to_string(),
            "-m".to_string(),
            config.model.clone(),
            "-i".to_string(),
            config.problem_id.as_str().to_string(),
            "-o".to_string(),
            path_to_string(&config.output_dir),
        ]
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
