//! Error extraction from benchmark report files.
//!
//! Two backends implement [`ErrorExtractor`]:
//!
//! - [`CommandExtractor`] shells out to an external extraction tool and
//!   captures whatever it prints.
//! - [`TracebackExtractor`] is the builtin extractor: Python tracebacks,
//!   pytest `E` lines, and HDL compile/simulation/linker errors, pulled out
//!   with surrounding context and deduplicated.
//!
//! Both return plain text; an empty result means "no findings".

use std::path::Path;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;
use crate::invoke::run_command;

/// Trait for error extraction backends, so tests can substitute fakes.
#[async_trait]
pub trait ErrorExtractor: Send + Sync {
    /// Extract error text from one report file. Empty output means the
    /// report is clean.
    async fn extract(&self, report: &Path) -> Result<String>;
}

// ---------------------------------------------------------------------------
// External extraction command
// ---------------------------------------------------------------------------

/// Extractor backed by an external command, invoked once per report with the
/// report path appended to the configured argv.
///
/// The command's exit status is not consulted: a crashing extractor that
/// writes to stderr is indistinguishable from one that found errors. That
/// matches the historical harness behavior.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    /// Command prefix; the report path is appended as the final argument.
    pub command: Vec<String>,
}

impl CommandExtractor {
    /// Create an extractor from a command prefix.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl ErrorExtractor for CommandExtractor {
    async fn extract(&self, report: &Path) -> Result<String> {
        let mut argv = self.command.clone();
        argv.push(report.to_string_lossy().into_owned());
        let output = run_command(&argv, 0).await?;
        Ok(output.combined())
    }
}

// ---------------------------------------------------------------------------
// Builtin traceback / HDL error extractor
// ---------------------------------------------------------------------------

/// A context-window extraction rule: lines matching `pattern` are captured
/// together with `before` preceding and `after` following non-blank lines.
struct ContextRule {
    pattern: Regex,
    /// Substrings that disqualify an otherwise matching line.
    exclude: &'static [&'static str],
    before: usize,
    after: usize,
}

impl ContextRule {
    fn new(pattern: &str, before: usize, after: usize) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("static pattern"),
            exclude: &[],
            before,
            after,
        }
    }

    fn with_exclude(mut self, exclude: &'static [&'static str]) -> Self {
        self.exclude = exclude;
        self
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line) && !self.exclude.iter().any(|s| line.contains(s))
    }
}

/// Builtin extractor for Python tracebacks and HDL tool errors.
pub struct TracebackExtractor {
    exception_line: Regex,
    pytest_error: Regex,
    traceback_file_frame: Regex,
    rules: Vec<ContextRule>,
}

impl Default for TracebackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TracebackExtractor {
    /// Build the extractor with its full rule set.
    pub fn new() -> Self {
        let rules = vec![
            ContextRule::new(r"(?i)(syntax error|parse error|compilation error)", 2, 2),
            ContextRule::new(r"(?i)(iverilog|verilator|vvp).*error", 1, 2),
            ContextRule::new(
                r"(?i)(undeclared|undefined|not declared|unknown identifier)",
                1,
                1,
            ),
            ContextRule::new(
                r"(?i)(type mismatch|width mismatch|incompatible|illegal)",
                1,
                1,
            ),
            ContextRule::new(
                r"(?i)(undefined reference|linker error|ld:|link error)",
                1,
                1,
            ),
            ContextRule::new(r"(?i)(assertion failed|assert.*failed|\$fatal|\$error)", 1, 1)
                .with_exclude(&["File \"/src"]),
            ContextRule::new(
                r"(?i)(segmentation fault|segfault|core dumped|signal 11)",
                2,
                2,
            ),
            ContextRule::new(
                r"(?i)(module.*not found|port.*not found|missing port|unresolved)",
                1,
                1,
            ),
            ContextRule::new(
                r"(?i)(cannot open|file not found|no such file).*\.(v|sv|vh|svh)",
                0,
                0,
            ),
            ContextRule::new(r"(?i)(unknown value|value is x|value is z|tri-state)", 0, 0)
                .with_exclude(&["Cannot convert Logic"]),
        ];

        Self {
            exception_line: Regex::new(r"^\w+(Error|Exception):").expect("static pattern"),
            pytest_error: Regex::new(r"^E\s+\w+(Error|Exception):").expect("static pattern"),
            traceback_file_frame: Regex::new(r#"^\s+File "/"#).expect("static pattern"),
            rules,
        }
    }

    /// Extract error blocks from report text. Returns the empty string when
    /// nothing matches.
    pub fn extract_text(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut blocks: Vec<Vec<String>> = Vec::new();

        self.collect_tracebacks(&lines, &mut blocks);
        self.collect_exception_lines(&lines, &mut blocks);
        self.collect_rule_matches(&lines, &mut blocks);

        // Drop duplicate blocks, keeping first-seen order
        let mut seen = std::collections::HashSet::new();
        let mut out = String::new();
        for block in blocks {
            if block.is_empty() {
                continue;
            }
            let joined = block.join("\n");
            if seen.insert(joined.clone()) {
                out.push_str(&joined);
                out.push_str("\n\n");
            }
        }
        out
    }

    /// Full Python tracebacks: from the `Traceback` header through the final
    /// exception line, following indented frames.
    fn collect_tracebacks(&self, lines: &[&str], blocks: &mut Vec<Vec<String>>) {
        let mut current: Vec<String> = Vec::new();
        let mut in_traceback = false;

        for line in lines {
            if line.contains("Traceback (most recent call last):") {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                in_traceback = true;
                current.push(line.trim_end().to_string());
                continue;
            }

            if in_traceback {
                let stripped = line.trim();
                if line.starts_with("  ") || self.exception_line.is_match(stripped) {
                    current.push(line.trim_end().to_string());
                } else {
                    if !current.is_empty() {
                        blocks.push(std::mem::take(&mut current));
                    }
                    in_traceback = false;
                }
            }
        }

        if !current.is_empty() {
            blocks.push(current);
        }
    }

    /// `CalledProcessError` and pytest `E SomeError:` lines, with context.
    fn collect_exception_lines(&self, lines: &[&str], blocks: &mut Vec<Vec<String>>) {
        for (i, line) in lines.iter().enumerate() {
            if line.contains("CalledProcessError:") {
                blocks.push(context_block(lines, i, 3, 0));
            } else if self.pytest_error.is_match(line) {
                blocks.push(context_block(lines, i, 2, 0));
            }
        }
    }

    /// HDL/simulator/linker error patterns. Lines already captured as part of
    /// a Python traceback are skipped.
    fn collect_rule_matches(&self, lines: &[&str], blocks: &mut Vec<Vec<String>>) {
        for (i, line) in lines.iter().enumerate() {
            if line.contains("Traceback (most recent call last)")
                || self.traceback_file_frame.is_match(line)
            {
                continue;
            }

            for rule in &self.rules {
                if rule.matches(line) {
                    blocks.push(context_block(lines, i, rule.before, rule.after));
                    break;
                }
            }
        }
    }
}

/// Non-blank lines in the window `[i - before, i + after]`, trimmed on the
/// right.
fn context_block(lines: &[&str], i: usize, before: usize, after: usize) -> Vec<String> {
    let start = i.saturating_sub(before);
    let end = (i + after + 1).min(lines.len());
    lines[start..end]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_end().to_string())
        .collect()
}

#[async_trait]
impl ErrorExtractor for TracebackExtractor {
    async fn extract(&self, report: &Path) -> Result<String> {
        let bytes = tokio::fs::read(report).await?;
        Ok(self.extract_text(&String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report_yields_empty() {
        let ex = TracebackExtractor::new();
        let text = "all tests passed\n100% coverage\n";
        assert_eq!(ex.extract_text(text), "");
    }

    #[test]
    fn test_python_traceback_captured() {
        let ex = TracebackExtractor::new();
        let text = "\
running testbench
Traceback (most recent call last):
  File \"/src/tb.py\", line 10, in <module>
    run()
ValueError: bad mapping
done
";
        let out = ex.extract_text(text);
        assert!(out.contains("Traceback (most recent call last):"));
        assert!(out.contains("ValueError: bad mapping"));
        assert!(!out.contains("running testbench"));
        assert!(!out.contains("done"));
    }

    #[test]
    fn test_pytest_error_line_with_context() {
        let ex = TracebackExtractor::new();
        let text = "\
collected 1 item
test_mapper.py F
E   AssertionError: expected 3 got 4
";
        let out = ex.extract_text(text);
        assert!(out.contains("E   AssertionError: expected 3 got 4"));
        assert!(out.contains("test_mapper.py F"));
    }

    #[test]
    fn test_hdl_syntax_error_with_context() {
        let ex = TracebackExtractor::new();
        let text = "\
compiling mapper.sv
mapper.sv:12: syntax error
I give up.
";
        let out = ex.extract_text(text);
        assert!(out.contains("mapper.sv:12: syntax error"));
        assert!(out.contains("I give up."));
    }

    #[test]
    fn test_called_process_error_context() {
        let ex = TracebackExtractor::new();
        let text = "\
cmd: iverilog -o sim tb.sv
exit status 1
subprocess.CalledProcessError: Command returned non-zero exit status 1.
";
        let out = ex.extract_text(text);
        assert!(out.contains("CalledProcessError"));
        assert!(out.contains("cmd: iverilog -o sim tb.sv"));
    }

    #[test]
    fn test_duplicate_blocks_deduplicated() {
        let ex = TracebackExtractor::new();
        let text = "\
Traceback (most recent call last):
  File \"/x.py\", line 1, in <module>
ValueError: boom
retrying once
Traceback (most recent call last):
  File \"/x.py\", line 1, in <module>
ValueError: boom
";
        let out = ex.extract_text(text);
        assert_eq!(out.matches("ValueError: boom").count(), 1);
    }

    #[test]
    fn test_assertion_in_source_frame_excluded() {
        let ex = TracebackExtractor::new();
        let text = "  File \"/src/test_runner.py\", assert x failed\n";
        assert_eq!(ex.extract_text(text), "");
    }

    #[tokio::test]
    async fn test_extract_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("r.txt");
        std::fs::write(&report, "Segmentation fault (core dumped)\n").unwrap();

        let ex = TracebackExtractor::new();
        let out = ex.extract(&report).await.unwrap();
        assert!(out.contains("Segmentation fault"));
    }

    #[tokio::test]
    async fn test_command_extractor_combines_streams() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("r.txt");
        std::fs::write(&report, "ignored\n").unwrap();

        let ex = CommandExtractor::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo out; echo err >&2; true".to_string(),
        ]);
        let text = ex.extract(&report).await.unwrap();
        assert!(text.contains("out"));
        assert!(text.contains("err"));
    }

    #[tokio::test]
    async fn test_command_extractor_ignores_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("r.txt");
        std::fs::write(&report, "ignored\n").unwrap();

        // Exits non-zero; the output is still captured, not an error.
        let ex = CommandExtractor::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo crashed >&2; exit 3".to_string(),
        ]);
        let text = ex.extract(&report).await.unwrap();
        assert!(text.contains("crashed"));
    }
}
