//! Scan result aggregation and terminal rendering.
//!
//! A [`ScanSummary`] is rebuilt from the error directory on every run, so the
//! count always reflects the files currently on disk rather than what this
//! process wrote.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix that marks extracted error files.
const ERROR_FILE_SUFFIX: &str = "_errors.txt";

/// One surviving error file, with the details shown in the listing.
#[derive(Debug, Clone)]
pub struct ErrorFileEntry {
    /// Path to the error file.
    pub path: PathBuf,

    /// File size in bytes. Always non-zero: empty files are pruned by the
    /// scanner.
    pub size_bytes: u64,

    /// Unix permission bits (0 on non-Unix platforms).
    pub mode: u32,
}

/// Aggregated result of one sweep over the error directory.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// The directory that was summarized.
    pub error_dir: PathBuf,

    /// Surviving error files, sorted by path.
    pub entries: Vec<ErrorFileEntry>,
}

impl ScanSummary {
    /// Collect all `*_errors.txt` files under `error_dir`, recursively.
    ///
    /// A missing directory counts as empty: the scanner creates it, but a
    /// summarize-only caller may point at a directory that never existed.
    pub fn collect(error_dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        collect_into(error_dir, &mut entries)?;
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            error_dir: error_dir.to_path_buf(),
            entries,
        })
    }

    /// Number of reports with errors.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Render the human-readable summary. The closing "Done!" line is the
    /// caller's to print.
    pub fn render_text(&self) -> String {
        if self.entries.is_empty() {
            return "No errors found in any reports!\n".to_string();
        }

        let mut text = format!("Found {} report(s) with errors.\n", self.count());
        for entry in &self.entries {
            text.push_str(&format!(
                "  {:>4o}  {:>8} B  {}\n",
                entry.mode & 0o7777,
                entry.size_bytes,
                entry.path.display()
            ));
        }
        text
    }
}

fn collect_into(dir: &Path, entries: &mut Vec<ErrorFileEntry>) -> Result<()> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect_into(&path, entries)?;
            continue;
        }

        let is_error_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(ERROR_FILE_SUFFIX))
            .unwrap_or(false);
        if !file_type.is_file() || !is_error_file {
            continue;
        }

        let metadata = entry.metadata()?;
        entries.push(ErrorFileEntry {
            path,
            size_bytes: metadata.len(),
            mode: permission_mode(&metadata),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn permission_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn permission_mode(_metadata: &std::fs::Metadata) -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_dir_counts_as_empty() {
        let dir = tempdir().unwrap();
        let summary = ScanSummary::collect(&dir.path().join("never_created")).unwrap();
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.render_text(), "No errors found in any reports!\n");
    }

    #[test]
    fn test_only_error_files_counted() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a_errors.txt"), "Error: X\n").unwrap();
        std::fs::write(dir.path().join("b_errors.txt"), "boom\n").unwrap();
        std::fs::write(dir.path().join("report.txt"), "not an error file\n").unwrap();

        let summary = ScanSummary::collect(dir.path()).unwrap();
        assert_eq!(summary.count(), 2);
    }

    #[test]
    fn test_recursive_collection() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("older_run");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a_errors.txt"), "x\n").unwrap();
        std::fs::write(nested.join("b_errors.txt"), "y\n").unwrap();

        let summary = ScanSummary::collect(dir.path()).unwrap();
        assert_eq!(summary.count(), 2);
    }

    #[test]
    fn test_render_lists_size_and_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b_errors.txt"), "Error: X\n").unwrap();

        let summary = ScanSummary::collect(dir.path()).unwrap();
        let text = summary.render_text();
        assert!(text.starts_with("Found 1 report(s) with errors."));
        assert!(text.contains("9 B"));
        assert!(text.contains("b_errors.txt"));
    }

    #[test]
    fn test_entries_sorted_by_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("z_errors.txt"), "x\n").unwrap();
        std::fs::write(dir.path().join("a_errors.txt"), "y\n").unwrap();

        let summary = ScanSummary::collect(dir.path()).unwrap();
        let names: Vec<_> = summary
            .entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a_errors.txt", "z_errors.txt"]);
    }
}
