//! Benchsweep Core Library
//!
//! Runs an external benchmark for one problem, scans the resulting report
//! files for error text, and summarizes the findings.

pub mod config;
pub mod error;
pub mod extract;
pub mod invoke;
pub mod problem;
pub mod scan;
pub mod summary;
pub mod sweep;
pub mod telemetry;

pub use config::{BenchmarkConfig, SweepConfig, DEFAULT_DATASET, DEFAULT_MODEL};
pub use error::{Result, SweepError};
pub use extract::{CommandExtractor, ErrorExtractor, TracebackExtractor};
pub use invoke::{run_command, BenchmarkRunner, CommandOutput, ProcessBenchmarkRunner};
pub use problem::ProblemId;
pub use scan::{scan_reports, ReportOutcome, ScanOutcome};
pub use summary::{ErrorFileEntry, ScanSummary};
pub use sweep::{run_sweep, SweepReport};
pub use telemetry::init_tracing;
