use std::fmt;

use thiserror::Error;

/// Fatal structural errors. Any of these aborts the conversion before any
/// output is written.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document cannot be read as structured markup: {0}")]
    MalformedDocument(String),

    #[error("head block {index} does not match the five-line contract: {reason}")]
    HeadStructure { index: usize, reason: String },

    #[error("content sentinel \"Inhalt:\" not found before end of document")]
    MissingContentSection,

    #[error("content block {index} violates the expected structure: {reason}")]
    ContentStructure { index: usize, reason: String },
}

impl ParseError {
    pub(crate) fn head(index: usize, reason: impl Into<String>) -> Self {
        Self::HeadStructure {
            index,
            reason: reason.into(),
        }
    }

    pub(crate) fn content(index: usize, reason: impl Into<String>) -> Self {
        Self::ContentStructure {
            index,
            reason: reason.into(),
        }
    }
}

/// A non-fatal deviation from the expected document format. Warnings are
/// accumulated during parsing and surfaced alongside a still-valid output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarning {
    /// Index of the offending block among non-blank paragraphs.
    pub index: usize,
    pub message: String,
}

impl FormatWarning {
    pub(crate) fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: {}", self.index, self.message)
    }
}
