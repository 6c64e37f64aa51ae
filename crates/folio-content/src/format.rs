//! Content format taxonomy.
//!
//! Every piece of pasted or imported content is assigned exactly one
//! [`Format`] tag by the classification cascade. The tag fully determines
//! which cleaner and which sanitize profile apply: both mappings are
//! fixed tables here, exhaustively matched so an unhandled format is a
//! compile error rather than a runtime fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sanitize::SanitizeProfile;

/// Content format detected for a string of unknown provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Unformatted prose; the fallback when nothing else matches
    Plain,
    /// Markdown source
    Markdown,
    /// Generic HTML markup
    Html,
    /// HTML with inline styling (bold/italic/color spans)
    Rich,
    /// Source code in any programming language
    Code,
    /// HTML exported by Microsoft Word (mso- styles, Office namespaces)
    Word,
    /// Rich Text Format
    Rtf,
    /// WordprocessingML (DOCX document XML)
    Docx,
    /// JSON document
    Json,
    /// Generic XML document
    Xml,
    /// Comma/semicolon/tab separated values
    Csv,
}

impl Format {
    /// All format tags, in cascade precedence-independent declaration order.
    pub const ALL: [Format; 11] = [
        Format::Plain,
        Format::Markdown,
        Format::Html,
        Format::Rich,
        Format::Code,
        Format::Word,
        Format::Rtf,
        Format::Docx,
        Format::Json,
        Format::Xml,
        Format::Csv,
    ];

    /// Lowercase wire name of this tag, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Plain => "plain",
            Format::Markdown => "markdown",
            Format::Html => "html",
            Format::Rich => "rich",
            Format::Code => "code",
            Format::Word => "word",
            Format::Rtf => "rtf",
            Format::Docx => "docx",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Csv => "csv",
        }
    }

    /// Whether [`crate::clean`] performs real normalization for this tag.
    ///
    /// The remaining six tags pass through cleaning unchanged.
    pub fn needs_cleaning(&self) -> bool {
        matches!(
            self,
            Format::Word | Format::Rtf | Format::Docx | Format::Html | Format::Rich
        )
    }

    /// Display trust profile applied to rendered markup of this format.
    ///
    /// Escaped `<pre><code>` output (code, JSON, XML, DOCX fallback) needs
    /// only the basic surface; formats that render headings, tables,
    /// images, or class-tagged paragraphs need the rich allow-list; plain
    /// paragraphs survive the strict profile.
    pub fn sanitize_profile(&self) -> SanitizeProfile {
        match self {
            Format::Plain => SanitizeProfile::Strict,
            Format::Docx | Format::Json | Format::Xml | Format::Code => SanitizeProfile::Basic,
            Format::Markdown
            | Format::Html
            | Format::Rich
            | Format::Word
            | Format::Rtf
            | Format::Csv => SanitizeProfile::Rich,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Format::Plain),
            "markdown" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            "rich" => Ok(Format::Rich),
            "code" => Ok(Format::Code),
            "word" => Ok(Format::Word),
            "rtf" => Ok(Format::Rtf),
            "docx" => Ok(Format::Docx),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}
