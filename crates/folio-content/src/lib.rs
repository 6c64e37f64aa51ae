//! # folio-content
//!
//! Content classification and normalization core for folio notes.
//!
//! Given an opaque blob of text of unknown provenance (paste, import, or
//! stored note body), this crate determines which of eleven content formats
//! it represents and transforms it into safe, display-ready markup:
//!
//! - [`classify`]: ordered cascade of heuristic format detectors
//! - [`clean`]: format-specific normalization for messy formats
//!   (Word HTML, RTF, DOCX XML, generic HTML, inline-styled rich text)
//! - [`render`]: per-format conversion to display markup
//! - [`sanitize`]: trust-profile enforcement for untrusted markup
//! - [`select_representation`]: best-representation selection for
//!   multi-MIME clipboard/import payloads
//!
//! All operations are synchronous, pure string transforms: no I/O, no
//! shared mutable state, and no panics or errors for any string input.
//! Malformed content degrades to an escaped best-effort fallback instead
//! of failing.
//!
//! ## Example
//!
//! ```
//! use folio_content::{classify, render, sanitize, Format};
//!
//! let pasted = "# Meeting notes\n\n- review the budget\n- ship it";
//! let format = classify(pasted);
//! assert_eq!(format, Format::Markdown);
//!
//! let markup = render(pasted, format);
//! let safe = sanitize(&markup, format.sanitize_profile());
//! assert!(safe.contains("<h1>"));
//! ```

pub mod classify;
pub mod clean;
pub mod clipboard;
pub mod defaults;
pub mod error;
pub mod format;
pub mod render;
pub mod sanitize;
pub mod text;

// Re-export commonly used items at crate root
pub use classify::{classify, classify_html_subtype};
pub use clean::clean;
pub use clipboard::{select_representation, MemoryPasteSource, PasteSource, PastedContent};
pub use error::{Error, Result};
pub use format::Format;
pub use render::render;
pub use sanitize::{sanitize, SanitizeProfile};
pub use text::escape_html;
