//! Centralized tuning constants for content classification and rendering.
//!
//! **This module is the single source of truth** for the heuristic
//! thresholds used by the classification cascade. The values are
//! empirically tuned against real pasted content (chat transcripts,
//! LLM output, Office documents), not derived from a formal grammar;
//! they are part of the documented contract and the property tests
//! treat them as such. When adjusting a value, document the rationale.

// =============================================================================
// CLASSIFIER: MARKDOWN
// =============================================================================

/// Minimum number of distinct Markdown signal patterns required to
/// classify content as Markdown outright.
pub const MARKDOWN_SCORE_MIN: usize = 2;

/// Relaxed score accepted when the content also contains a heading line
/// (`#` through `######`) anywhere in the body.
pub const MARKDOWN_SCORE_WITH_HEADING: usize = 1;

// =============================================================================
// CLASSIFIER: CODE
// =============================================================================

/// Minimum number of distinct code signal patterns required to classify
/// content as source code outright.
pub const CODE_SCORE_MIN: usize = 3;

/// Relaxed score accepted when structural evidence (symbol density or
/// indentation) corroborates the pattern matches.
pub const CODE_SCORE_RELAXED: usize = 2;

/// Minimum proportion of `{ } ; ( ) =` characters over total length for
/// the relaxed code rule.
pub const CODE_SYMBOL_DENSITY_MIN: f64 = 0.05;

/// Minimum proportion of lines indented by at least
/// [`CODE_INDENT_WIDTH`] spaces for the relaxed code rule.
pub const CODE_INDENTED_LINE_RATIO: f64 = 0.30;

/// Leading-space count that marks a line as indented.
pub const CODE_INDENT_WIDTH: usize = 2;

// =============================================================================
// CLASSIFIER: WORD AND RICH TEXT
// =============================================================================

/// Minimum number of distinct Word-specific signals (mso- styles, Word
/// namespace tags, Office fonts) required for the `word` tag.
pub const WORD_SIGNAL_MIN: usize = 2;

/// Minimum number of distinct inline-styling signals required for the
/// `rich` tag.
pub const RICH_SIGNAL_MIN: usize = 2;

// =============================================================================
// CLASSIFIER: XML AND CSV
// =============================================================================

/// Allowed difference `|open - close - self_closing|` in tag counts for
/// the XML balance check. A tolerance of 1 absorbs a single root element
/// or minor irregularity; this is deliberate heuristic slack, not strict
/// well-formedness.
pub const XML_TAG_BALANCE_TOLERANCE: i64 = 1;

/// Minimum non-blank line count before the CSV rule applies at all.
pub const CSV_MIN_LINES: usize = 2;

/// Proportion of lines that must share the header line's separator count
/// for a candidate separator to win.
pub const CSV_CONSISTENCY_MIN: f64 = 0.80;

/// Separator candidates, tried in this fixed order. The first candidate
/// satisfying the consistency rule wins.
pub const CSV_SEPARATORS: [char; 3] = [',', ';', '\t'];

// =============================================================================
// CLIPBOARD
// =============================================================================

/// Fixed MIME preference order for multi-representation paste payloads.
/// The first type that is present and non-blank is used.
pub const MIME_PRIORITY: [&str; 7] = [
    "text/html",
    "text/rtf",
    "text/plain",
    "text/uri-list",
    "application/json",
    "text/xml",
    "text/csv",
];

// =============================================================================
// RENDERING
// =============================================================================

/// Placeholder graphic swapped in for images that fail to load.
/// URL-encoded inline SVG so it needs no network fetch and survives
/// being embedded in a single-quoted attribute value.
pub const IMAGE_FALLBACK_SRC: &str = "data:image/svg+xml,%3Csvg%20xmlns=%22http://www.w3.org/2000/svg%22%20width=%2224%22%20height=%2224%22%20viewBox=%220%200%2024%2024%22%3E%3Cpath%20fill=%22%23999%22%20d=%22M21%2019V5a2%202%200%200%200-2-2H5a2%202%200%200%200-2%202v14a2%202%200%200%200%202%202h14a2%202%200%200%200%202-2zM8.5%2013.5l2.5%203%203.01-3.99L19%2017H5l3.5-3.5z%22/%3E%3C/svg%3E";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds_ordered() {
        const {
            assert!(MARKDOWN_SCORE_WITH_HEADING < MARKDOWN_SCORE_MIN);
            assert!(CODE_SCORE_RELAXED < CODE_SCORE_MIN);
            assert!(CSV_MIN_LINES >= 2);
        }
    }

    #[test]
    fn ratios_are_proportions() {
        for value in [
            CODE_SYMBOL_DENSITY_MIN,
            CODE_INDENTED_LINE_RATIO,
            CSV_CONSISTENCY_MIN,
        ] {
            assert!(value > 0.0 && value < 1.0, "Expected proportion, got {}", value);
        }
    }

    #[test]
    fn mime_priority_prefers_html() {
        assert_eq!(MIME_PRIORITY[0], "text/html");
        assert!(MIME_PRIORITY.contains(&"text/plain"));
    }

    #[test]
    fn image_fallback_is_inline_and_quote_safe() {
        assert!(IMAGE_FALLBACK_SRC.starts_with("data:image/svg+xml,"));
        // Injected inside a single-quoted onerror handler value
        assert!(!IMAGE_FALLBACK_SRC.contains('\''));
        assert!(!IMAGE_FALLBACK_SRC.contains('"'));
    }
}
