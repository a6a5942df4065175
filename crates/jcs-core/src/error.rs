//! Error types for JCS decoding and canonicalization.

use thiserror::Error;

/// Errors that can occur while decoding or canonicalizing JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JcsError {
    /// The input was not acceptable JSON.
    /// `offset` is the 0-based byte position where the problem was detected.
    #[error("JSON parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A number that cannot be represented in canonical form (NaN or infinite).
    /// The decoder never produces one, so this signals a value tree that was
    /// built by hand or corrupted after parsing.
    #[error("Format error: {0}")]
    Format(String),
}

impl JcsError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        JcsError::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset of a parse error, if this is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            JcsError::Parse { offset, .. } => Some(*offset),
            JcsError::Format(_) => None,
        }
    }
}

/// Convenience alias used throughout jcs-core.
pub type Result<T> = std::result::Result<T, JcsError>;
