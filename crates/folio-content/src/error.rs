//! Error types for folio-content.
//!
//! The public call surfaces (`classify`, `clean`, `render`, `sanitize`) are
//! total functions and never return these errors; they exist for the
//! internal fallible steps (JSON parsing, XML event reading) and are
//! absorbed into graceful fallbacks at the public boundary.

use thiserror::Error;

/// Result type alias using folio-content's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for folio-content operations.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing or serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML event reading failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Unrecognized format tag name
    #[error("Unknown format: {0}")]
    UnknownFormat(String),
}
