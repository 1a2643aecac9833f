//! Error types for the parser.
//!
//! Only failures that abort a whole document are errors. Heuristic misses
//! (unknown headers, short table rows, missing responders) are reported as
//! warnings on the parsed record instead.

use thiserror::Error;

/// Main error type for the parser library.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Document uid does not end in a language marker.
    #[error("Invalid document uid: '{0}'. Expected an id ending in 'e' or 'c' (e.g., council_agenda-20140618-e)")]
    InvalidUid(String),

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected d.m.yyyy (e.g., 9.10.2013)")]
    InvalidDate(String),

    /// The markup produced no document tree to work with.
    #[error("Document {uid} contains no markup")]
    EmptyDocument { uid: String },

    /// A required part of a question document is missing.
    #[error("Missing {section} section in question document {uid}")]
    MissingSection { uid: String, section: String },

    /// A required field of a question document could not be found.
    #[error("Could not find {field} in question document {uid}")]
    MissingField { uid: String, field: String },

    /// Listing language code is neither English nor Chinese.
    #[error("Invalid language code: '{0}'. Expected 'E' or 'C'")]
    InvalidLanguage(String),

    /// Question number/type listing could not be understood.
    #[error("Could not parse number and type of question from '{0}'")]
    UnrecognizedListing(String),

    /// Source file is not in a format the converter accepts.
    #[error("Unsupported document format for {path}{}", .extension.as_ref().map(|e| format!(" (.{e})")).unwrap_or_default())]
    UnsupportedFormat {
        path: String,
        extension: Option<String>,
    },

    /// Character encoding label that cannot be decoded.
    #[error("Unsupported character encoding: '{0}'")]
    UnsupportedEncoding(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;
