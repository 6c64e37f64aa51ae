//! Standalone string helpers shared by the cleaners, renderers, and
//! sanitizer: HTML entity escaping and whitespace normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Escapes the five HTML-significant characters unconditionally.
///
/// Used wherever raw content is embedded inside markup the renderers
/// produce (`<pre>` blocks, table cells, paragraphs).
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escapes HTML-significant characters while leaving character references
/// that are already escaped (`&amp;`, `&#39;`, `&#x27;`, …) intact.
///
/// This is the markdown sanitize profile: applying it twice yields the
/// same string, which the full [`escape_html`] cannot guarantee.
pub fn escape_preserving_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, ch) in input.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '&' => {
                if starts_entity(&input[i..]) {
                    out.push('&');
                } else {
                    out.push_str("&amp;");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether `s` (which starts with `&`) begins a character reference:
/// a named, decimal, or hexadecimal entity terminated by `;` within a
/// short window.
fn starts_entity(s: &str) -> bool {
    let rest = &s[1..];
    let semi = match rest.find(';') {
        // Longest named references in common use fit well under 10 chars
        Some(i) if i > 0 && i <= 10 => i,
        _ => return false,
    };
    let body = &rest[..semi];
    if let Some(numeric) = body.strip_prefix('#') {
        if let Some(hex) = numeric.strip_prefix('x').or_else(|| numeric.strip_prefix('X')) {
            return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
        }
        return !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit());
    }
    body.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Collapses every run of two or more whitespace characters to a single
/// space. Leading/trailing whitespace is left to the caller.
pub fn collapse_whitespace(input: &str) -> String {
    WS_RUN_RE.replace_all(input, " ").into_owned()
}
