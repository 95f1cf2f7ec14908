//! Compliance rules for published mortgage content.

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A phrase that must not appear in published copy.
#[derive(Debug, Clone)]
pub struct ComplianceRule {
    pub id: &'static str,
    pub pattern: Regex,
    pub severity: Severity,
    pub message: &'static str,
}

impl ComplianceRule {
    fn new(id: &'static str, pattern: &str, severity: Severity, message: &'static str) -> Self {
        Self {
            id,
            // Patterns are literals below; a bad one is a programming error.
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("rule {id}: {e}")),
            severity,
            message,
        }
    }
}

/// Prohibited claims checked line by line.
pub fn default_rules() -> Vec<ComplianceRule> {
    vec![
        ComplianceRule::new(
            "guaranteed-approval",
            r"(?i)\bguarantee(d)?\s+(mortgage\s+)?approv(al|ed)\b",
            Severity::Error,
            "Approval cannot be guaranteed",
        ),
        ComplianceRule::new(
            "guaranteed-rate",
            r"(?i)\b(lowest|best)\s+rates?\s+guaranteed\b|\bguaranteed\s+(lowest|best)\s+rates?\b",
            Severity::Error,
            "Rates cannot be guaranteed",
        ),
        ComplianceRule::new(
            "no-credit-check",
            r"(?i)\bno\s+credit\s+checks?\b",
            Severity::Error,
            "Lenders always review credit",
        ),
        ComplianceRule::new(
            "risk-free",
            r"(?i)\brisk[\s-]free\b",
            Severity::Error,
            "Borrowing is never risk-free",
        ),
        ComplianceRule::new(
            "universal-approval",
            r"(?i)\b100\s?%\s+approv(al|ed)\b|\beveryone\s+(is\s+)?approved\b",
            Severity::Error,
            "Approval depends on the applicant",
        ),
        ComplianceRule::new(
            "superlative-rates",
            r"(?i)\bbest\s+rates?\s+in\s+canada\b",
            Severity::Error,
            "Unsubstantiated comparative claim",
        ),
    ]
}

/// A percentage figure that reads like an interest rate.
pub fn rate_mention() -> Regex {
    Regex::new(r"\d+(\.\d+)?\s?%").unwrap_or_else(|e| panic!("rate pattern: {e}"))
}

/// Any of these satisfies the rate disclaimer requirement.
pub const DISCLAIMER_PHRASES: [&str; 4] = [
    "rates are subject to change",
    "o.a.c.",
    "on approved credit",
    "subject to lender approval",
];

/// Front-matter keys every post must define.
pub const REQUIRED_FRONT_MATTER: [&str; 3] = ["title", "description", "date"];
