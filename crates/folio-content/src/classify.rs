//! Heuristic format classification for content of unknown provenance.
//!
//! [`classify`] runs a fixed-order cascade of pattern checks and commits
//! to the first rule that matches, so the ordering itself encodes the
//! precedence policy: structural formats (RTF, Word XML, JSON, XML, CSV)
//! are checked before prose-like formats (HTML, Markdown, code, rich
//! text) because their markers have a lower false-positive rate. The
//! cascade is deterministic (the same input always yields the same tag)
//! and total: any string, including the empty string, gets exactly one of
//! the eleven tags.
//!
//! All score thresholds live in [`crate::defaults`] so they can be tuned
//! and tested independently of the pattern lists.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::defaults::{
    CODE_INDENTED_LINE_RATIO, CODE_INDENT_WIDTH, CODE_SCORE_MIN, CODE_SCORE_RELAXED,
    CODE_SYMBOL_DENSITY_MIN, CSV_CONSISTENCY_MIN, CSV_MIN_LINES, CSV_SEPARATORS,
    MARKDOWN_SCORE_MIN, MARKDOWN_SCORE_WITH_HEADING, RICH_SIGNAL_MIN, WORD_SIGNAL_MIN,
    XML_TAG_BALANCE_TOLERANCE,
};
use crate::format::Format;

fn regexes(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Heading at the very start of the content: the single strongest
/// Markdown signal in pasted chat/LLM text, special-cased ahead of
/// scoring.
static LEADING_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());

/// Heading on any line, used for the relaxed markdown score rule.
static HEADING_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+\S").unwrap());

/// Markdown signal patterns. Each contributes at most one point to the
/// score regardless of how often it matches.
static MARKDOWN_SIGNALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    regexes(&[
        // Headers
        r"(?m)^#{1,6}\s+\S",
        // Horizontal rules
        r"(?m)^(?:-{3,}|\*{3,}|_{3,})\s*$",
        // Unordered lists
        r"(?m)^\s*[-*+]\s+\S",
        // Ordered lists
        r"(?m)^\s*\d+\.\s+\S",
        // Images (checked independently of links)
        r"!\[[^\]]*\]\([^)]+\)",
        // Links
        r"\[[^\]]+\]\([^)]+\)",
        // Fenced code blocks
        r"(?m)^```",
        // Inline code
        r"`[^`\n]+`",
        // Blockquotes
        r"(?m)^>\s+\S",
        // Bold
        r"\*\*[^*\n]+\*\*",
        r"__[^_\n]+__",
        // Italic
        r"\*[^*\s][^*\n]*\*",
        r"\b_[^_\n]+_\b",
        // Strikethrough
        r"~~[^~\n]+~~",
        // Table rows
        r"(?m)^\|.+\|\s*$",
        // Table separator rows
        r"(?m)^\s*\|(?:\s*:?-+:?\s*\|)+\s*$",
        // Task-list checkboxes
        r"(?m)^\s*[-*+]\s+\[[ xX]\]\s",
    ])
});

/// Code signal patterns: language keywords and control flow, comment
/// syntax, block-structure punctuation, and SQL/typed-declaration
/// keywords from other languages.
static CODE_SIGNALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    regexes(&[
        // Control flow with call-style parens
        r"\bif\s*\(",
        r"\bfor\s*\(",
        r"\bwhile\s*\(",
        r"\bswitch\s*\(",
        // Declarations
        r"\bfunction\s+\w+\s*\(",
        r"\bclass\s+\w+",
        r"\bdef\s+\w+\s*\(",
        r"\bfn\s+\w+\s*\(",
        r"\b(?:let|const|var)\s+\w+\s*=",
        r"\breturn\b",
        // Imports / includes
        r"(?m)^\s*import\s+[\w{\x22\x27*]",
        r"(?m)^\s*from\s+[\w.]+\s+import\b",
        r#"#include\s*[<"]"#,
        r"(?m)^\s*use\s+\w+(?:::\w+)+",
        // Arrow functions / closures
        r"=>",
        // Comments
        r"(?m)^\s*//",
        r"(?s)/\*.*?\*/",
        r"(?m)^\s*#\s*\w+",
        // Block structure punctuation at line ends
        r"(?m);\s*$",
        r"(?m)\{\s*$",
        r"(?m)^\s*\}\s*$",
        // SQL
        r"(?si)\bselect\b.+\bfrom\b",
        r"(?i)\binsert\s+into\b",
        r"(?i)\bcreate\s+table\b",
        // Typed declarations (Java/C#/C)
        r"\bpublic\s+(?:static\s+)?\w+",
        r"\b(?:void|int|bool|string)\s+\w+\s*\(",
    ])
});

/// Word-specific signals: vendor styles, Office fonts, namespace tags,
/// Word CSS classes, indentation styles, and list/outline markers.
static WORD_SIGNALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    regexes(&[
        r"(?i)mso-",
        r"(?i)Times New Roman",
        r"(?i)\bCalibri\b",
        r"(?i)\bArial\b",
        r"(?i)</?[owvm]:\w",
        r#"(?i)class="Mso"#,
        r#"(?i)style="[^"]*(?:margin|text-indent|line-height)"#,
        r"(?i)mso-list|mso-outline-level",
    ])
});

/// Generic inline-styling signals for rich text that did not come from
/// Word.
static RICH_SIGNALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    regexes(&[
        r#"(?i)style\s*=\s*""#,
        r"(?i)font-weight\s*:\s*bold|<b[\s>]|<strong[\s>]",
        r"(?i)font-style\s*:\s*italic|<i[\s>]|<em[\s>]",
        r"(?i)text-decoration\s*:\s*underline|<u[\s>]",
        r"(?i)color\s*:\s*#?\w+",
        r"(?i)<(?:strike|sup|sub|font)[\s>]",
        r"(?i)<li[^>]+style=",
    ])
});

/// Tags whose presence suggests HTML rather than arbitrary XML.
static HTML_KNOWN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)<(?:div|span|p|a|ul|ol|li|table|thead|tbody|tr|td|th|h[1-6]|br|hr|img|b|i|u|strong|em|blockquote|pre|code|section|article|header|footer|nav|form|input|button)[\s/>]",
    )
    .unwrap()
});

static HTML_ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\w+\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap());
static HTML_SELF_CLOSING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\s*>").unwrap());
static HTML_CLOSING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[a-zA-Z][\w-]*>").unwrap());
static HTML_STRUCTURAL_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:p|div|table|ul|ol|h[1-6]|br|span|img|a|blockquote|pre)[\s/>]").unwrap()
});

static XML_ENCLOSED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<[a-zA-Z][^>]*>.*</[a-zA-Z][^>]*>$").unwrap());
static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[a-zA-Z][^>]*>").unwrap());
static CLOSE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[a-zA-Z][^>]*>").unwrap());
static SELF_CLOSING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*/>").unwrap());

/// Assigns one of the eleven format tags to `content`.
///
/// Empty or whitespace-only input is always `plain`. The first matching
/// rule in the cascade wins; see the module docs for the precedence
/// rationale.
pub fn classify(content: &str) -> Format {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Format::Plain;
    }

    let format = classify_inner(content, trimmed);
    debug!(
        format = %format,
        content_len = content.len(),
        "classified content"
    );
    format
}

fn classify_inner(content: &str, trimmed: &str) -> Format {
    if is_rtf(trimmed) {
        return Format::Rtf;
    }
    if is_word_xml(content) {
        return Format::Docx;
    }
    if is_json(trimmed) {
        return Format::Json;
    }
    if is_xml(trimmed) {
        return Format::Xml;
    }
    if is_csv(content) {
        return Format::Csv;
    }
    if is_html(content) {
        return Format::Html;
    }
    if is_markdown(content, trimmed) {
        return Format::Markdown;
    }
    if is_code(content) {
        return Format::Code;
    }
    if signal_score(&WORD_SIGNALS, content) >= WORD_SIGNAL_MIN {
        return Format::Word;
    }
    if signal_score(&RICH_SIGNALS, content) >= RICH_SIGNAL_MIN {
        return Format::Rich;
    }
    Format::Plain
}

/// Narrower classifier for content that arrived through an HTML-typed
/// MIME channel: distinguishes Word HTML, styled rich text, and plain
/// structural HTML, deferring to the full cascade when none match.
pub fn classify_html_subtype(content: &str) -> Format {
    if signal_score(&WORD_SIGNALS, content) >= WORD_SIGNAL_MIN {
        return Format::Word;
    }
    if signal_score(&RICH_SIGNALS, content) >= RICH_SIGNAL_MIN {
        return Format::Rich;
    }
    if HTML_STRUCTURAL_TAG_RE.is_match(content) {
        return Format::Html;
    }
    classify(content)
}

/// Number of signal patterns that match at least once. Each pattern
/// contributes a single point.
fn signal_score(signals: &[Regex], content: &str) -> usize {
    signals.iter().filter(|re| re.is_match(content)).count()
}

/// Rule 1: RTF header, `{\rtf` followed by a version digit.
fn is_rtf(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("{\\rtf")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Rule 2: WordprocessingML, an XML declaration plus a Word namespace
/// marker.
fn is_word_xml(content: &str) -> bool {
    content.contains("<?xml")
        && (content.contains("w:document")
            || content.contains("office:word")
            || content.contains("microsoft-com:office"))
}

/// Rule 3: bracket/brace-delimited content that actually parses as JSON.
/// A parse failure silently disqualifies JSON and lets the cascade
/// continue.
fn is_json(trimmed: &str) -> bool {
    let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !delimited {
        return false;
    }
    serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

/// Rule 4: XML declaration, or tag-enclosed non-HTML content with
/// near-balanced tag counts. The HTML check is consulted so that
/// XHTML-like input without a declaration falls through to the HTML rule
/// (HTML wins when both signals are strong).
fn is_xml(trimmed: &str) -> bool {
    if trimmed.starts_with("<?xml") {
        return true;
    }
    if !XML_ENCLOSED_RE.is_match(trimmed) {
        return false;
    }
    if is_html(trimmed) {
        return false;
    }
    let open = OPEN_TAG_RE.find_iter(trimmed).count() as i64;
    let close = CLOSE_TAG_RE.find_iter(trimmed).count() as i64;
    let self_closing = SELF_CLOSING_TAG_RE.find_iter(trimmed).count() as i64;
    (open - close - self_closing).abs() <= XML_TAG_BALANCE_TOLERANCE
}

/// Rule 5: at least [`CSV_MIN_LINES`] non-blank lines where one separator
/// candidate keeps a consistent per-line occurrence count. Candidates are
/// tried in fixed order and the first consistent one wins.
fn is_csv(content: &str) -> bool {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < CSV_MIN_LINES {
        return false;
    }
    for sep in CSV_SEPARATORS {
        let header_count = lines[0].matches(sep).count();
        if header_count == 0 {
            continue;
        }
        let consistent = lines
            .iter()
            .filter(|line| line.matches(sep).count() == header_count)
            .count();
        if consistent as f64 / lines.len() as f64 >= CSV_CONSISTENCY_MIN {
            trace!(separator = ?sep, lines = lines.len(), "CSV separator consistent");
            return true;
        }
    }
    false
}

/// Rule 6: doctype/html markers, or a known HTML tag corroborated by an
/// attribute, a self-closing tag, or a closing tag.
fn is_html(content: &str) -> bool {
    let lower = content.to_lowercase();
    if lower.contains("<!doctype") || lower.contains("<html") {
        return true;
    }
    HTML_KNOWN_TAG_RE.is_match(content)
        && (HTML_ATTRIBUTE_RE.is_match(content)
            || HTML_SELF_CLOSING_RE.is_match(content)
            || HTML_CLOSING_TAG_RE.is_match(content))
}

/// Rule 7: leading heading wins immediately; a `•` bullet anywhere
/// disqualifies; otherwise score the signal patterns.
///
/// The bullet rule treats `•` as evidence of pre-formatted text rather
/// than Markdown source. It is a known false-negative source for
/// legitimate Markdown that uses the glyph in prose, kept for behavior
/// compatibility.
fn is_markdown(content: &str, trimmed: &str) -> bool {
    if LEADING_HEADING_RE.is_match(trimmed) {
        return true;
    }
    if content.contains('\u{2022}') {
        return false;
    }
    let score = signal_score(&MARKDOWN_SIGNALS, content);
    score >= MARKDOWN_SCORE_MIN
        || (score >= MARKDOWN_SCORE_WITH_HEADING && HEADING_LINE_RE.is_match(content))
}

/// Rule 8: pattern score alone, or a relaxed score backed by symbol
/// density or indentation structure.
fn is_code(content: &str) -> bool {
    let score = signal_score(&CODE_SIGNALS, content);
    if score >= CODE_SCORE_MIN {
        return true;
    }
    if score < CODE_SCORE_RELAXED {
        return false;
    }
    symbol_density(content) > CODE_SYMBOL_DENSITY_MIN
        || indented_line_ratio(content) >= CODE_INDENTED_LINE_RATIO
}

/// Proportion of `{ } ; ( ) =` characters over total character count.
fn symbol_density(content: &str) -> f64 {
    let total = content.chars().count();
    if total == 0 {
        return 0.0;
    }
    let symbols = content
        .chars()
        .filter(|c| matches!(c, '{' | '}' | ';' | '(' | ')' | '='))
        .count();
    symbols as f64 / total as f64
}

/// Proportion of non-blank lines indented by at least
/// [`CODE_INDENT_WIDTH`] spaces.
fn indented_line_ratio(content: &str) -> f64 {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return 0.0;
    }
    let indented = lines
        .iter()
        .filter(|line| line.chars().take_while(|c| *c == ' ').count() >= CODE_INDENT_WIDTH)
        .count();
    indented as f64 / lines.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_are_plain() {
        assert_eq!(classify(""), Format::Plain);
        assert_eq!(classify("   \n\t  "), Format::Plain);
    }

    #[test]
    fn test_rtf_header() {
        assert_eq!(classify(r"{\rtf1\ansi Hello}"), Format::Rtf);
        // Header without a version digit is not RTF
        assert_ne!(classify(r"{\rtfx nope}"), Format::Rtf);
    }

    #[test]
    fn test_word_xml_needs_declaration_and_namespace() {
        let docx = r#"<?xml version="1.0"?><w:document><w:body><w:t>Hi</w:t></w:body></w:document>"#;
        assert_eq!(classify(docx), Format::Docx);
        // Declaration alone routes to plain XML instead
        assert_eq!(classify(r#"<?xml version="1.0"?><note/>"#), Format::Xml);
    }

    #[test]
    fn test_json_requires_successful_parse() {
        assert_eq!(classify(r#"{"a": 1, "b": [1, 2]}"#), Format::Json);
        assert_eq!(classify("[1, 2, 3]"), Format::Json);
        // Brace-delimited but unparseable: falls through, not an error
        assert_ne!(classify("{not json at all}"), Format::Json);
    }

    #[test]
    fn test_xml_balance_tolerance() {
        assert_eq!(classify("<note><to>Ana</to><from>Bo</from></note>"), Format::Xml);
        assert_eq!(classify("<root><leaf/><leaf/></root>"), Format::Xml);
        // Wildly unbalanced tag soup is not XML
        assert_ne!(classify("<x><y><z><w>text</w>"), Format::Xml);
    }

    #[test]
    fn test_csv_consistent_commas() {
        assert_eq!(classify("a,b,c\n1,2,3\n4,5,6"), Format::Csv);
    }

    #[test]
    fn test_csv_prefers_consistent_semicolon_over_inconsistent_comma() {
        // Comma counts vary per line; semicolon counts are uniform
        let content = "name;city, notes\nana;lisbon\nbo;porto, maybe, later";
        assert!(is_csv(content));
        assert_eq!(classify(content), Format::Csv);
    }

    #[test]
    fn test_csv_needs_two_lines() {
        assert_ne!(classify("a,b,c"), Format::Csv);
    }

    #[test]
    fn test_html_doctype_and_tags() {
        assert_eq!(classify("<!DOCTYPE html><html><body>x</body></html>"), Format::Html);
        assert_eq!(classify(r#"<div class="box"><p>hello</p></div>"#), Format::Html);
    }

    #[test]
    fn test_xhtml_prefers_html() {
        // Both structural signals are strong; the XML rule stands down
        let xhtml = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><p>hi</p></body></html>"#;
        assert_eq!(classify(xhtml), Format::Html);
    }

    #[test]
    fn test_markdown_heading_priority() {
        // A single leading heading is decisive even with no other signals
        assert_eq!(classify("# Title\nSome text"), Format::Markdown);
    }

    #[test]
    fn test_markdown_scoring() {
        assert_eq!(classify("Some **bold** and a [link](https://x.y)"), Format::Markdown);
        // One signal plus a heading further down also qualifies
        assert_eq!(classify("intro line\n## Section\nplain words"), Format::Markdown);
    }

    #[test]
    fn test_bullet_disqualifies_markdown() {
        let bullets = "\u{2022} First\n\u{2022} Second";
        assert_ne!(classify(bullets), Format::Markdown);
        assert_eq!(classify(bullets), Format::Plain);
    }

    #[test]
    fn test_code_by_score() {
        let snippet = "function add(a, b) {\n  // sum\n  return a + b;\n}";
        assert_eq!(classify(snippet), Format::Code);
    }

    #[test]
    fn test_code_relaxed_rule_uses_density() {
        let snippet = "let total = a + b;\nlet scaled = total * factor;\n\nemit(scaled)";
        assert!(symbol_density(snippet) > CODE_SYMBOL_DENSITY_MIN);
        assert_eq!(classify(snippet), Format::Code);
    }

    #[test]
    fn test_sql_is_code() {
        let sql = "SELECT id, name\nFROM users\nWHERE active = 1;\n\nINSERT INTO logs (user_id, action)\nVALUES (42, 'login');";
        assert_eq!(classify(sql), Format::Code);
    }

    #[test]
    fn test_uniform_trailing_semicolons_read_as_csv() {
        // The CSV rule runs before the code rule, so statement lists with
        // one semicolon per line are claimed by the separator-consistency
        // check. This pins the precedence rather than endorsing it.
        let snippet = "let x = compute(1);\nlet y = compute(2);";
        assert_eq!(classify(snippet), Format::Csv);
    }

    #[test]
    fn test_word_signals() {
        let word = r#"<p class="MsoNormal" style="mso-margin-top-alt:auto">Hi</p>"#;
        assert_eq!(classify_html_subtype(word), Format::Word);
    }

    #[test]
    fn test_rich_signals() {
        let rich = r#"<span style="font-weight: bold; color: #ff0000">loud</span>"#;
        assert_eq!(classify_html_subtype(rich), Format::Rich);
    }

    #[test]
    fn test_html_subtype_structural_fallback() {
        assert_eq!(classify_html_subtype("<p>just a paragraph</p>"), Format::Html);
        // No signals at all: defer to the full cascade
        assert_eq!(classify_html_subtype("just words"), Format::Plain);
    }

    #[test]
    fn test_prose_is_plain() {
        let prose = "Dear team,\n\nThe meeting moved to Thursday. Please update your calendars.\n\nThanks";
        assert_eq!(classify(prose), Format::Plain);
    }

    #[test]
    fn test_totality_over_hostile_inputs() {
        // Must never panic, whatever the input shape
        let long = "x".repeat(10_000);
        let inputs = [
            "{",
            "<",
            "<<<>>>",
            "{\\rtf",
            "\u{0}\u{1}\u{2}",
            "<?xml",
            "|||",
            "```",
            "a\u{2022}b",
            long.as_str(),
        ];
        for input in inputs {
            let _ = classify(input);
        }
    }
}
