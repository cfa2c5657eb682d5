//! Report scanning: one extraction pass per report file.
//!
//! For every `*.txt` report under the report directory, the configured
//! extractor runs once and its captured text lands in
//! `extracted_errors/<stem>_errors.txt`. Empty captures are pruned, so a
//! surviving file means "errors were found for this report". Writing before
//! pruning keeps reruns idempotent over stale leftovers from earlier runs.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::extract::ErrorExtractor;

/// Extension of report files eligible for scanning.
const REPORT_EXTENSION: &str = "txt";

/// Outcome for a single report file.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// The scanned report.
    pub report: PathBuf,

    /// The surviving error file, if the extraction found anything.
    pub error_file: Option<PathBuf>,
}

impl ReportOutcome {
    /// Whether the extraction found errors for this report.
    pub fn has_errors(&self) -> bool {
        self.error_file.is_some()
    }
}

/// Outcome of a full scan over the report directory.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Per-report outcomes, in file-name order.
    pub reports: Vec<ReportOutcome>,

    /// The error directory that was populated.
    pub error_dir: PathBuf,
}

impl ScanOutcome {
    /// Number of reports whose extraction produced findings.
    pub fn reports_with_errors(&self) -> usize {
        self.reports.iter().filter(|r| r.has_errors()).count()
    }
}

/// Scan every report for the configured problem and write per-report error
/// files.
///
/// Fails with [`SweepError::ReportDirMissing`] before any extraction if the
/// report directory does not exist. The error directory is created
/// idempotently. Reports are processed sorted by file name.
pub async fn scan_reports(
    config: &SweepConfig,
    extractor: &dyn ErrorExtractor,
) -> Result<ScanOutcome> {
    let report_dir = config.report_dir();
    if !report_dir.is_dir() {
        return Err(SweepError::ReportDirMissing(report_dir));
    }

    let error_dir = config.error_dir();
    std::fs::create_dir_all(&error_dir)?;

    let mut report_files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(&report_dir)? {
        let entry = entry?;
        let path = entry.path();
        // Only regular *.txt files directly under the report directory
        if !entry.file_type()?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(REPORT_EXTENSION) {
            debug!(report = %path.display(), "Skipping non-report file");
            continue;
        }
        report_files.push(path);
    }
    report_files.sort();

    info!(
        report_dir = %report_dir.display(),
        count = report_files.len(),
        "Scanning reports"
    );

    let mut reports = Vec::with_capacity(report_files.len());
    for report in report_files {
        let stem = report
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report")
            .to_string();
        let error_file = error_dir.join(format!("{}_errors.txt", stem));

        let captured = extractor.extract(&report).await?;
        std::fs::write(&error_file, captured.as_bytes())?;

        let outcome = if captured.is_empty() {
            std::fs::remove_file(&error_file)?;
            info!(report = %report.display(), "No errors found");
            ReportOutcome {
                report,
                error_file: None,
            }
        } else {
            info!(
                report = %report.display(),
                error_file = %error_file.display(),
                "Errors extracted"
            );
            ReportOutcome {
                report,
                error_file: Some(error_file),
            }
        };
        reports.push(outcome);
    }

    Ok(ScanOutcome { reports, error_dir })
}
