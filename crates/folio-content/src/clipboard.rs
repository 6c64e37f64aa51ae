//! Best-representation selection for multi-MIME paste and import
//! payloads.
//!
//! A browser-style clipboard event exposes the same payload under
//! several MIME types at once. [`select_representation`] walks a fixed
//! priority list, takes the first type that is present and non-blank,
//! and resolves its format: structured types map directly, HTML routes
//! through the narrower HTML sub-classifier, and plain/unknown types
//! fall back to content-based classification (a markdown verdict from
//! the content classifier is kept, never downgraded to plain).

use tracing::debug;

use crate::classify::{classify, classify_html_subtype};
use crate::defaults::MIME_PRIORITY;
use crate::format::Format;

/// A source exposing zero or more named representations of one payload,
/// keyed by MIME type. Implemented over clipboard events, import
/// bundles, or plain in-memory maps.
pub trait PasteSource {
    /// The content stored under `mime`, if that representation exists.
    fn representation(&self, mime: &str) -> Option<String>;

    /// Every available MIME type key, in the source's natural order.
    fn available_types(&self) -> Vec<String>;
}

/// Selected representation: the chosen content and its resolved format.
/// Ownership transfers to the caller; the core retains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastedContent {
    pub content: String,
    pub format: Format,
}

impl PastedContent {
    fn empty() -> Self {
        Self {
            content: String::new(),
            format: Format::Plain,
        }
    }
}

/// Ordered in-memory [`PasteSource`], used by the import pipeline and
/// tests. Enumeration order is insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryPasteSource {
    entries: Vec<(String, String)>,
}

impl MemoryPasteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the representation stored under `mime`.
    pub fn insert(&mut self, mime: impl Into<String>, content: impl Into<String>) -> &mut Self {
        let mime = mime.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(key, _)| *key == mime) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((mime, content)),
        }
        self
    }
}

impl PasteSource for MemoryPasteSource {
    fn representation(&self, mime: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(key, _)| key == mime)
            .map(|(_, content)| content.clone())
    }

    fn available_types(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Picks the best available representation from `source`.
///
/// Walks the fixed MIME priority list first; if none of those types are
/// present and non-blank, scans all available types in their natural
/// order. A source with no usable representation yields empty `plain`
/// content rather than an error.
pub fn select_representation(source: &dyn PasteSource) -> PastedContent {
    for mime in MIME_PRIORITY {
        if let Some(selected) = try_representation(source, mime) {
            return selected;
        }
    }
    for mime in source.available_types() {
        if let Some(selected) = try_representation(source, &mime) {
            return selected;
        }
    }
    debug!("no usable clipboard representation, defaulting to empty plain");
    PastedContent::empty()
}

fn try_representation(source: &dyn PasteSource, mime: &str) -> Option<PastedContent> {
    let content = source.representation(mime)?;
    if content.trim().is_empty() {
        return None;
    }
    let format = resolve_format(mime, &content);
    debug!(mime, format = %format, "selected clipboard representation");
    Some(PastedContent { content, format })
}

/// Maps a MIME type to a format tag, consulting the content classifiers
/// where the type alone is not specific enough.
fn resolve_format(mime: &str, content: &str) -> Format {
    match mime {
        "text/html" => classify_html_subtype(content),
        "text/rtf" => Format::Rtf,
        "application/json" | "text/json" => Format::Json,
        "text/xml" | "application/xml" => Format::Xml,
        "text/csv" => Format::Csv,
        // text/plain, text/uri-list, and unmapped types: the content
        // classifier decides, and its markdown verdict is kept
        _ => classify(content),
    }
}
