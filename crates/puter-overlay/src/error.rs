//! Error types.
//!
//! None of these escape the reconciler as user-visible failures: the overlay degrades to
//! "nothing shown" instead. They exist so each layer can say precisely why something was
//! skipped, and so the reconciler can log it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced while normalizing, reconciling or configuring the overlay.
pub enum OverlayError {
    #[error("malformed evaluation payload: {0}")]
    /// The notification payload matches none of the recognized shapes.
    MalformedPayload(String),

    #[error("unsupported evaluation payload schema version {0}")]
    /// The payload carries an explicit `schemaVersion` this engine does not understand.
    UnsupportedSchemaVersion(u64),

    #[error("no active editor to target")]
    /// A report without a document identity arrived while no editor was focused.
    NoActiveEditor,

    #[error("line {line} is out of range (document has {line_count} lines)")]
    /// An entry references a line the document no longer has.
    UnresolvableLine {
        /// The requested line.
        line: usize,
        /// Current line count of the document.
        line_count: usize,
    },

    #[error("unknown document: {0}")]
    /// The host does not know the document.
    UnknownDocument(String),

    #[error("invalid configuration: {0}")]
    /// The settings object could not be decoded.
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure of a host line lookup.
pub enum LineLookupError {
    #[error("document is not open")]
    /// The host has no open document for the URI.
    UnknownDocument,

    #[error("line {line} is out of range (document has {line_count} lines)")]
    /// The line does not exist.
    LineOutOfRange {
        /// The requested line.
        line: usize,
        /// Current line count of the document.
        line_count: usize,
    },
}

impl LineLookupError {
    /// Attach the document URI and lift into an [`OverlayError`].
    pub fn into_overlay_error(self, uri: &str) -> OverlayError {
        match self {
            Self::UnknownDocument => OverlayError::UnknownDocument(uri.to_string()),
            Self::LineOutOfRange { line, line_count } => {
                OverlayError::UnresolvableLine { line, line_count }
            }
        }
    }
}
