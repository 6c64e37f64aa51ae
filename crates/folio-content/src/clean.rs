//! Format-specific normalization for messy formats.
//!
//! Each cleaner is a pure string transform that strips vendor/tool
//! markup noise while preserving the salient content. Cleaning cannot
//! fail: unparseable input degrades to an escaped best-effort fallback
//! instead of raising an error.

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};
use tracing::trace;

use crate::error::Result;
use crate::format::Format;
use crate::text::{collapse_whitespace, escape_html};

// ─── Word HTML ─────────────────────────────────────────────────────────────

static WORD_NS_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?(?:o|w|m|v):[^>]*>").unwrap());
static MSO_CLASS_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s*class\s*=\s*"Mso[^"]*""#).unwrap());
static MSO_STYLE_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)mso-[^;"']+;?"#).unwrap());
static EMPTY_STYLE_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s*style\s*=\s*"[\s;]*""#).unwrap());
static INTER_TAG_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());

// ─── RTF ───────────────────────────────────────────────────────────────────

static RTF_CONTROL_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+-?\d* ?").unwrap());
static RTF_HEX_ESCAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\'[0-9a-fA-F]{2}").unwrap());

// ─── Generic HTML ──────────────────────────────────────────────────────────

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());
static HTML_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

// ─── Rich text ─────────────────────────────────────────────────────────────

static STYLE_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s*style\s*=\s*"([^"]*)""#).unwrap());
static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{6})$").unwrap());

/// Normalizes `content` for its detected format.
///
/// A no-op pass-through for the six formats that carry no vendor noise
/// (plain, markdown, code, json, xml, csv).
pub fn clean(content: &str, format: Format) -> String {
    match format {
        Format::Word => clean_word(content),
        Format::Rtf => clean_rtf(content),
        Format::Docx => clean_docx(content),
        Format::Html => clean_html(content),
        Format::Rich => clean_rich(content),
        Format::Plain
        | Format::Markdown
        | Format::Code
        | Format::Json
        | Format::Xml
        | Format::Csv => content.to_string(),
    }
}

/// Strips Word's export noise: `<o:p>`/`<w:...>` namespace tags, `Mso*`
/// CSS classes, `mso-` style declarations, and the empty `style=""`
/// attributes the declaration stripping leaves behind.
fn clean_word(content: &str) -> String {
    let stripped = WORD_NS_TAG_RE.replace_all(content, "");
    let stripped = MSO_CLASS_ATTR_RE.replace_all(&stripped, "");
    let stripped = MSO_STYLE_DECL_RE.replace_all(&stripped, "");
    let collapsed = collapse_whitespace(&stripped);
    let collapsed = INTER_TAG_WS_RE.replace_all(&collapsed, "><");
    EMPTY_STYLE_ATTR_RE.replace_all(&collapsed, "").into_owned()
}

/// Strips RTF control words and brace delimiters, collapses whitespace,
/// and wraps what remains in an escaped paragraph tagged as RTF-derived
/// content.
fn clean_rtf(content: &str) -> String {
    let stripped = RTF_HEX_ESCAPE_RE.replace_all(content, " ");
    let stripped = RTF_CONTROL_WORD_RE.replace_all(&stripped, "");
    let stripped: String = stripped.chars().filter(|c| *c != '{' && *c != '}').collect();
    let text = collapse_whitespace(&stripped);
    format!(
        "<p class=\"rtf-content\">{}</p>",
        escape_html(text.trim())
    )
}

/// Extracts WordprocessingML text runs (`w:t`, or bare `t` in other
/// namespaces) and joins them with spaces. Parse failure, or a document
/// with no text runs, falls back to an escaped preformatted block.
fn clean_docx(content: &str) -> String {
    match docx_text_runs(content) {
        Ok(runs) if !runs.is_empty() => {
            trace!(run_count = runs.len(), "extracted DOCX text runs");
            format!("<p>{}</p>", escape_html(&runs.join(" ")))
        }
        _ => format!("<pre>{}</pre>", escape_html(content)),
    }
}

fn docx_text_runs(content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut runs = Vec::new();
    let mut in_text_run = false;
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) if e.local_name().as_ref() == b"t" => in_text_run = false,
            Event::Text(t) if in_text_run => {
                let text = t.unescape()?;
                if !text.trim().is_empty() {
                    runs.push(text.trim().to_string());
                }
            }
            _ => {}
        }
    }
    Ok(runs)
}

/// Strips `<script>`/`<style>` blocks with their contents and HTML
/// comments, then collapses whitespace between tags.
fn clean_html(content: &str) -> String {
    let stripped = SCRIPT_BLOCK_RE.replace_all(content, "");
    let stripped = STYLE_BLOCK_RE.replace_all(&stripped, "");
    let stripped = HTML_COMMENT_RE.replace_all(&stripped, "");
    INTER_TAG_WS_RE.replace_all(&stripped, "><").into_owned()
}

/// Rewrites every `style="..."` attribute down to the whitelisted
/// declarations (bold, italic, underline, hex color), dropping the
/// attribute entirely when nothing survives.
fn clean_rich(content: &str) -> String {
    STYLE_ATTR_RE
        .replace_all(content, |caps: &Captures| {
            let kept = filter_style_declarations(&caps[1]);
            if kept.is_empty() {
                String::new()
            } else {
                format!(" style=\"{}\"", kept.join("; "))
            }
        })
        .into_owned()
}

fn filter_style_declarations(style: &str) -> Vec<String> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_lowercase();
            let value = value.trim();
            let keep = match name.as_str() {
                "font-weight" => value.eq_ignore_ascii_case("bold"),
                "font-style" => value.eq_ignore_ascii_case("italic"),
                "text-decoration" => value.eq_ignore_ascii_case("underline"),
                "color" => HEX_COLOR_RE.is_match(value),
                _ => false,
            };
            keep.then(|| format!("{}: {}", name, value.to_lowercase()))
        })
        .collect()
}
