//! Error types for the wrangler.
//!
//! A single `WranglerError` enum covers the whole pipeline. Malformed
//! qualifying elements are fatal by policy: emitting a guessed or partial
//! record would corrupt downstream document-store consumers.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the wrangler library.
#[derive(Debug, Error)]
pub enum WranglerError {
    /// Input file missing or not a regular file.
    #[error("Input file not found or not readable: {}", .0.display())]
    InputNotFound(PathBuf),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("Malformed XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Malformed XML escape sequence in an attribute value.
    #[error("Malformed XML escape sequence: {0}")]
    XmlEscape(#[from] quick_xml::escape::EscapeError),

    /// A qualifying element is missing a required attribute.
    #[error("Missing required attribute '{attribute}' on <{kind}> element")]
    MissingAttribute { attribute: String, kind: String },

    /// A required numeric attribute did not parse.
    #[error("Attribute '{attribute}' has non-numeric value '{value}'")]
    InvalidNumber { attribute: String, value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for wrangler operations.
pub type Result<T> = std::result::Result<T, WranglerError>;
