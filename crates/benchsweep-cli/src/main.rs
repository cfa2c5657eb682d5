//! benchsweep - run a benchmark problem and sweep its reports for errors.
//!
//! Invokes the external benchmark runner for one problem, then scans the
//! resulting `reports/*.txt` files, writing any extracted error text to a
//! parallel `extracted_errors/` directory and printing a summary. Finding
//! errors in reports is a successful outcome; only a failed benchmark run or
//! a missing report directory aborts the sweep.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use benchsweep_core::{
    run_sweep, BenchmarkConfig, CommandExtractor, ErrorExtractor, ProblemId,
    ProcessBenchmarkRunner, SweepConfig, TracebackExtractor,
};

#[derive(Debug, Parser)]
#[command(name = "benchsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a benchmark problem and extract errors from its reports", long_about = None)]
#[command(after_help = "\
Examples:
  benchsweep cvdp_copilot_16qam_mapper_0001 work_1
  benchsweep cvdp_copilot_16qam_mapper_0001 work_1 gpt-4o dataset/custom.jsonl")]
struct Cli {
    /// Benchmark problem id (must end in a run-number suffix, e.g. _0001)
    problem_id: String,

    /// Output directory passed to the benchmark runner
    output_dir: PathBuf,

    /// Model name
    #[arg(default_value = benchsweep_core::DEFAULT_MODEL)]
    model: String,

    /// Dataset path (not checked for existence; the runner owns it)
    #[arg(default_value = benchsweep_core::DEFAULT_DATASET)]
    dataset: String,

    /// Benchmark runner program
    #[arg(long, default_value = "./run_benchmark.py")]
    benchmark_cmd: String,

    /// Benchmark timeout in seconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    timeout_secs: u64,

    /// External extraction command (report path is appended); the builtin
    /// traceback extractor is used when absent
    #[arg(long, num_args = 1.., value_name = "CMD")]
    extractor: Option<Vec<String>>,

    /// Scan existing reports without running the benchmark
    #[arg(long)]
    skip_benchmark: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

/// Exit status for a failed parse: 1 for usage errors, 0 for help/version.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            std::process::exit(parse_exit_code(&err));
        }
    };

    benchsweep_core::init_tracing(cli.json, cli.verbose);

    let problem_id = ProblemId::new(cli.problem_id.clone())
        .with_context(|| format!("invalid problem id: {}", cli.problem_id))?;
    let config = SweepConfig::new(
        problem_id,
        cli.output_dir,
        Some(cli.model),
        Some(cli.dataset),
    );
    let benchmark = BenchmarkConfig {
        program: cli.benchmark_cmd,
        timeout_secs: cli.timeout_secs,
    };

    let extractor: Box<dyn ErrorExtractor> = match cli.extractor {
        Some(command) => Box::new(CommandExtractor::new(command)),
        None => Box::new(TracebackExtractor::new()),
    };

    cmd_sweep(&config, benchmark, extractor.as_ref(), cli.skip_benchmark).await
}

/// Run the sweep and print the human-readable result.
async fn cmd_sweep(
    config: &SweepConfig,
    benchmark: BenchmarkConfig,
    extractor: &dyn ErrorExtractor,
    skip_benchmark: bool,
) -> Result<()> {
    println!("Problem: {}", config.problem_id);
    println!("Output directory: {}", config.output_dir.display());
    println!("Model: {}", config.model);
    println!("Dataset: {}", config.dataset);
    println!();

    let runner = ProcessBenchmarkRunner::new(benchmark);
    let report = match run_sweep(config, &runner, extractor, skip_benchmark).await {
        Ok(report) => report,
        Err(e) => {
            // Fatal conditions also get a human-readable line on stdout
            println!("✗ {}", e);
            return Err(e.into());
        }
    };

    for outcome in &report.scan.reports {
        let name = outcome.report.display();
        match &outcome.error_file {
            Some(error_file) => println!("✗ {} -> {}", name, error_file.display()),
            None => println!("✓ {} (no errors found)", name),
        }
    }
    if !report.scan.reports.is_empty() {
        println!();
    }

    print!("{}", report.summary.render_text());
    println!("Done!");
    Ok(())
}
