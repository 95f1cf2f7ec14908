//! Compliance checks for blog and guide content.
//!
//! Posts are Markdown with a YAML-style front-matter block. The scanner
//! flags prohibited lending claims, percentages quoted without a rate
//! disclaimer and missing front-matter keys.

pub mod rules;
pub mod scanner;

pub use rules::{default_rules, ComplianceRule, Severity};
pub use scanner::{ContentError, ContentReport, Finding, Scanner};
