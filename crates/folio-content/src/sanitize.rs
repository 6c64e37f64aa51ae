//! Trust-profile enforcement for untrusted markup.
//!
//! [`sanitize`] is the last line of defense before markup reaches a
//! display surface: every caller that inserts externally-sourced markup
//! into the display tree runs it through one of four fixed allow-list
//! profiles. Renderers never assume their own output is already safe.
//!
//! The three tag-filtering profiles are built on ammonia allow-lists;
//! the `markdown` profile entity-escapes wholesale instead, because
//! Markdown source must never be interpreted as markup before it
//! reaches the Markdown renderer. All four are idempotent: sanitizing
//! already-sanitized output is a no-op.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::text::escape_preserving_entities;

/// Named trust profile selecting which tags, attributes, and URI schemes
/// survive sanitization. Profiles are immutable configuration constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeProfile {
    /// Inline emphasis and paragraphs only, no attributes
    Strict,
    /// Adds lists, quotes, code, and links with a scheme allow-list
    Basic,
    /// Broad structural/semantic allow-list for trusted-ish rich content
    Rich,
    /// Wholesale entity escaping for raw Markdown source
    Markdown,
}

/// URI schemes allowed on links in the `basic` and `rich` profiles.
/// Scheme-less (relative) URLs pass through untouched.
const LINK_SCHEMES: [&str; 7] = ["http", "https", "mailto", "tel", "callto", "cid", "xmpp"];

fn link_schemes() -> HashSet<&'static str> {
    LINK_SCHEMES.iter().copied().collect()
}

static STRICT: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(["b", "i", "em", "strong", "u", "br", "p"].into_iter().collect())
        .tag_attributes(HashMap::new())
        .generic_attributes(HashSet::new());
    builder
});

static BASIC: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(
            [
                "b", "i", "em", "strong", "u", "br", "p", "ul", "ol", "li", "blockquote",
                "code", "pre", "a",
            ]
            .into_iter()
            .collect(),
        )
        .tag_attributes(HashMap::from([(
            "a",
            ["href", "title", "target", "rel"].into_iter().collect(),
        )]))
        .generic_attributes(HashSet::new())
        .url_schemes(link_schemes())
        .link_rel(None);
    builder
});

static RICH: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(
            [
                // Inline
                "b", "i", "em", "strong", "u", "br", "s", "strike", "del", "ins", "mark",
                "sub", "sup", "small", "abbr", "span", "a", "code",
                // Block structure
                "p", "div", "blockquote", "pre", "hr", "h1", "h2", "h3", "h4", "h5", "h6",
                // Lists
                "ul", "ol", "li", "dl", "dt", "dd",
                // Tables
                "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption",
                // Media containers
                "img", "figure", "figcaption",
                // Disclosure
                "details", "summary",
            ]
            .into_iter()
            .collect(),
        )
        .tag_attributes(HashMap::from([
            ("a", ["href", "title", "target", "rel"].into_iter().collect()),
            (
                "img",
                ["src", "alt", "title", "width", "height"].into_iter().collect(),
            ),
            ("td", ["colspan", "rowspan"].into_iter().collect()),
            ("th", ["colspan", "rowspan"].into_iter().collect()),
        ]))
        .generic_attributes(["style", "id", "class", "width", "height"].into_iter().collect())
        .url_schemes(link_schemes())
        .link_rel(None)
        // Forbidden outright: tag AND contents are dropped, not unwrapped
        .clean_content_tags(
            ["script", "style", "iframe", "object", "embed", "form"]
                .into_iter()
                .collect(),
        );
    builder
});

/// Applies the given trust profile to `markup`.
///
/// Total for any string input: malformed markup collapses to whatever
/// the allow-list filtering produces, never an error.
pub fn sanitize(markup: &str, profile: SanitizeProfile) -> String {
    match profile {
        SanitizeProfile::Strict => STRICT.clean(markup).to_string(),
        SanitizeProfile::Basic => BASIC.clean(markup).to_string(),
        SanitizeProfile::Rich => RICH.clean(markup).to_string(),
        SanitizeProfile::Markdown => escape_preserving_entities(markup),
    }
}
