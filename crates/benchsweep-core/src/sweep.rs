//! The sweep pipeline: benchmark invocation, report scan, summary.
//!
//! Control flow is strictly linear with two hard-fail checkpoints — a failed
//! benchmark run and a missing report directory — both short-circuited with
//! `?`. Finding errors in reports is a normal, successful outcome.

use tracing::{error, info};

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::extract::ErrorExtractor;
use crate::invoke::{BenchmarkRunner, CommandOutput};
use crate::scan::{scan_reports, ScanOutcome};
use crate::summary::ScanSummary;

/// Result of a complete sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Output of the benchmark process, when it was run.
    pub benchmark: Option<CommandOutput>,

    /// Per-report scan outcomes.
    pub scan: ScanOutcome,

    /// Summary over the error directory as it stands after the scan.
    pub summary: ScanSummary,
}

/// Run the full pipeline for one problem.
///
/// With `skip_benchmark` the benchmark invocation is omitted and only
/// existing reports are scanned and summarized.
pub async fn run_sweep(
    config: &SweepConfig,
    runner: &dyn BenchmarkRunner,
    extractor: &dyn ErrorExtractor,
    skip_benchmark: bool,
) -> Result<SweepReport> {
    let benchmark = if skip_benchmark {
        info!(problem_id = %config.problem_id, "Skipping benchmark run");
        None
    } else {
        info!(
            problem_id = %config.problem_id,
            model = %config.model,
            "Running benchmark"
        );
        let output = runner.run(config).await?;
        if !output.success {
            error!(
                exit_code = output.exit_code,
                duration_ms = output.duration_ms,
                "Benchmark run failed"
            );
            return Err(SweepError::BenchmarkFailed {
                exit_code: output.exit_code,
            });
        }
        info!(duration_ms = output.duration_ms, "Benchmark run completed");
        Some(output)
    };

    let scan = scan_reports(config, extractor).await?;
    let summary = ScanSummary::collect(&scan.error_dir)?;

    info!(
        reports = scan.reports.len(),
        with_errors = summary.count(),
        "Sweep complete"
    );

    Ok(SweepReport {
        benchmark,
        scan,
        summary,
    })
}
