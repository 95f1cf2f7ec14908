//! Free-text sanitization applied before storage.
//!
//! Stored leads end up in admin views and CRM exports, so every free-text
//! field is reduced to plain text and HTML-escaped.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:javascript|vbscript|data)\s*:").unwrap());
static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").unwrap());

/// Reduce `input` to escaped plain text of at most `max_len` characters
/// (counted before escaping).
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let truncated: String = plain_text(input).chars().take(max_len).collect();
    escape_html(truncated.trim_end())
}

/// Markup-free, trimmed text, not yet escaped.
pub fn plain_text(input: &str) -> String {
    strip_markup(input).trim().to_string()
}

/// Trimmed, tag-free, lowercased email.
pub fn sanitize_email(input: &str) -> String {
    strip_markup(input).trim().to_lowercase()
}

/// Trimmed, tag-free phone number with formatting characters preserved.
pub fn sanitize_phone(input: &str) -> String {
    strip_markup(input).trim().to_string()
}

fn strip_markup(input: &str) -> String {
    let s = SCRIPT_BLOCK.replace_all(input, "");
    let s = STYLE_BLOCK.replace_all(&s, "");
    let s = TAG.replace_all(&s, "");
    let s = URL_SCHEME.replace_all(&s, "");
    let s = EVENT_HANDLER.replace_all(&s, "");
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Escapes characters that are significant in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
