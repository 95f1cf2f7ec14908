//! Markdown post scanning.

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::content::rules::{
    default_rules, rate_mention, ComplianceRule, Severity, DISCLAIMER_PHRASES, REQUIRED_FRONT_MATTER,
};

const EXTENSIONS: [&str; 2] = ["md", "mdx"];
const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
    pub excerpt: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ContentReport {
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
}

impl ContentReport {
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Scans documents against a rule set.
pub struct Scanner {
    rules: Vec<ComplianceRule>,
    rate: Regex,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Scanner {
    pub fn new(rules: Vec<ComplianceRule>) -> Self {
        Self {
            rules,
            rate: rate_mention(),
        }
    }

    pub fn scan_document(&self, path: &Path, text: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        let (front_matter, body_start) = split_front_matter(text);

        match front_matter {
            Some(keys) => {
                for key in REQUIRED_FRONT_MATTER {
                    if !keys.iter().any(|k| k == key) {
                        findings.push(finding(
                            path,
                            1,
                            "front-matter",
                            Severity::Error,
                            format!("front matter is missing `{key}`"),
                            "",
                        ));
                    }
                }
            }
            None => findings.push(finding(
                path,
                1,
                "front-matter",
                Severity::Error,
                "document has no front matter".to_string(),
                "",
            )),
        }

        let mut first_rate_line = None;
        for (idx, line) in text.lines().enumerate().skip(body_start) {
            let line_no = idx + 1;
            for rule in &self.rules {
                if rule.pattern.is_match(line) {
                    findings.push(finding(path, line_no, rule.id, rule.severity, rule.message.to_string(), line));
                }
            }
            if first_rate_line.is_none() && self.rate.is_match(line) {
                first_rate_line = Some((line_no, line));
            }
        }

        if let Some((line_no, line)) = first_rate_line {
            let lower = text.to_lowercase();
            if !DISCLAIMER_PHRASES.iter().any(|p| lower.contains(p)) {
                findings.push(finding(
                    path,
                    line_no,
                    "rate-disclaimer",
                    Severity::Warning,
                    "rates are quoted without a disclaimer".to_string(),
                    line,
                ));
            }
        }

        findings.sort_by_key(|f| f.line);
        findings
    }

    /// Scan every Markdown file under `dir`, in path order.
    pub fn scan_directory(&self, dir: &Path) -> Result<ContentReport, ContentError> {
        let mut report = ContentReport::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let text = std::fs::read_to_string(entry.path()).map_err(|source| ContentError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            report.files_scanned += 1;
            report.findings.extend(self.scan_document(entry.path(), &text));
        }

        tracing::debug!(
            files = report.files_scanned,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Content scan finished"
        );
        Ok(report)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Front-matter keys and the index of the first body line.
fn split_front_matter(text: &str) -> (Option<Vec<String>>, usize) {
    let mut lines = text.lines().enumerate();
    match lines.next() {
        Some((_, first)) if first.trim_end() == "---" => {}
        _ => return (None, 0),
    }

    let mut keys = Vec::new();
    for (idx, line) in lines {
        if line.trim_end() == "---" {
            return (Some(keys), idx + 1);
        }
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() && !value.trim().is_empty() {
                keys.push(key.to_string());
            }
        }
    }
    // Unterminated block: treat the whole file as body.
    (None, 0)
}

fn finding(
    path: &Path,
    line: usize,
    rule: &'static str,
    severity: Severity,
    message: String,
    excerpt: &str,
) -> Finding {
    Finding {
        path: path.to_path_buf(),
        line,
        rule,
        severity,
        message,
        excerpt: excerpt.trim().chars().take(EXCERPT_CHARS).collect(),
    }
}
