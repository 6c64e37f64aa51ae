//! Per-format rendering to display-ready markup.
//!
//! [`render`] is a total function over all eleven format tags: dispatch
//! is an exhaustive match, so an unhandled format cannot exist at
//! runtime. Messy formats are cleaned first; structural formats (JSON,
//! XML, CSV, code) are escaped into `<pre>`/table markup; markdown goes
//! through the commonmark engine.
//!
//! Rendering never fails. The only user-visible structural error is the
//! "Invalid JSON" block: at that point the user has an actionable
//! expectation that their content was valid JSON. Every other malformed
//! input degrades silently to an escaped fallback.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, Event, Options, Parser};
use regex::{Captures, Regex};
use tracing::debug;

use crate::clean::clean;
use crate::defaults::{CSV_SEPARATORS, IMAGE_FALLBACK_SRC};
use crate::error::Result;
use crate::format::Format;
use crate::text::escape_html;

static IMG_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static TAG_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s*<").unwrap());

/// Renders `content` of the given format into display markup,
/// composing the format's cleaner where one applies.
pub fn render(content: &str, format: Format) -> String {
    let markup = match format {
        Format::Markdown => render_markdown(content),
        Format::Html | Format::Rich => inject_image_fallback(content),
        Format::Word => inject_image_fallback(&clean(content, Format::Word)),
        Format::Rtf => clean(content, Format::Rtf),
        Format::Docx => clean(content, Format::Docx),
        Format::Json => render_json(content),
        Format::Xml => render_xml(content),
        Format::Csv => render_csv(content),
        Format::Code => render_code(content),
        Format::Plain => render_plain(content),
    };
    debug!(format = %format, markup_len = markup.len(), "rendered content");
    markup
}

/// Markdown via the commonmark engine with GFM tables, strikethrough,
/// and task lists enabled; single newlines render as hard breaks, which
/// matches how pasted chat text is meant to read.
fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut markup = String::with_capacity(content.len() * 2);
    html::push_html(&mut markup, parser);
    markup
}

/// Pretty-prints valid JSON inside an escaped code block; invalid JSON
/// gets a visible error block embedding the escaped original.
fn render_json(content: &str) -> String {
    match pretty_json(content) {
        Ok(pretty) => format!(
            "<pre><code class=\"language-json\">{}</code></pre>",
            escape_html(&pretty)
        ),
        Err(_) => error_block("Invalid JSON", content),
    }
}

fn pretty_json(content: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Best-effort XML re-indent: a newline at every tag boundary, escaped
/// into a code block. Not a well-formedness pass.
fn render_xml(content: &str) -> String {
    let reflowed = TAG_BOUNDARY_RE.replace_all(content.trim(), ">\n<");
    format!(
        "<pre><code class=\"language-xml\">{}</code></pre>",
        escape_html(&reflowed)
    )
}

/// CSV as an HTML table: the first row becomes the header, the rest the
/// body. The separator is whichever candidate occurs most often in the
/// first line.
fn render_csv(content: &str) -> String {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some((header, body)) = lines.split_first() else {
        return "<p class=\"csv-empty\">Empty CSV</p>".to_string();
    };
    let separator = dominant_separator(header);

    let mut markup = String::from("<table><thead><tr>");
    for cell in split_row(header, separator) {
        markup.push_str("<th>");
        markup.push_str(&escape_html(&cell));
        markup.push_str("</th>");
    }
    markup.push_str("</tr></thead><tbody>");
    for line in body {
        markup.push_str("<tr>");
        for cell in split_row(line, separator) {
            markup.push_str("<td>");
            markup.push_str(&escape_html(&cell));
            markup.push_str("</td>");
        }
        markup.push_str("</tr>");
    }
    markup.push_str("</tbody></table>");
    markup
}

/// The candidate with the highest occurrence count in the first line;
/// earlier candidates win ties.
fn dominant_separator(header: &str) -> char {
    let mut best = CSV_SEPARATORS[0];
    let mut best_count = 0;
    for sep in CSV_SEPARATORS {
        let count = header.matches(sep).count();
        if count > best_count {
            best = sep;
            best_count = count;
        }
    }
    best
}

/// Splits a row, trims each cell, and strips a single layer of
/// surrounding quotes.
fn split_row(line: &str, separator: char) -> Vec<String> {
    line.split(separator)
        .map(|cell| strip_quote_layer(cell.trim()).to_string())
        .collect()
}

fn strip_quote_layer(cell: &str) -> &str {
    for quote in ['"', '\''] {
        if cell.len() >= 2 && cell.starts_with(quote) && cell.ends_with(quote) {
            return &cell[1..cell.len() - 1];
        }
    }
    cell
}

fn render_code(content: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(content))
}

/// Plain text as paragraphs: blank lines delimit paragraphs, single
/// newlines inside a paragraph become `<br>`.
fn render_plain(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            format!("<p>{}</p>", escape_html(paragraph).replace('\n', "<br>"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Visible rendering error with the escaped original content, shown only
/// where the user has an actionable expectation of validity.
fn error_block(message: &str, original: &str) -> String {
    format!(
        "<div class=\"render-error\"><p>{}</p><pre>{}</pre></div>",
        escape_html(message),
        escape_html(original)
    )
}

/// Adds an inline load-failure handler to every `<img>` tag: on error
/// the broken image is swapped for a fixed placeholder graphic and the
/// handler clears itself so the swap cannot loop. Presentation
/// robustness, not a security control.
fn inject_image_fallback(markup: &str) -> String {
    IMG_TAG_RE
        .replace_all(markup, |caps: &Captures| {
            let tag = &caps[0];
            if tag.to_ascii_lowercase().contains("onerror") {
                return tag.to_string();
            }
            let handler = format!(
                " onerror=\"this.onerror=null;this.src='{}';\"",
                IMAGE_FALLBACK_SRC
            );
            if let Some(head) = tag.strip_suffix("/>") {
                format!("{}{}/>", head.trim_end(), handler)
            } else {
                // Plain `>` close; the regex guarantees the suffix
                format!("{}{}>", &tag[..tag.len() - 1], handler)
            }
        })
        .into_owned()
}
