//! Error types for field pattern construction.

use thiserror::Error;

/// Errors that can occur while building field patterns.
///
/// Extraction itself never fails; only compiling a caller-supplied pattern can.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The pattern source is not a valid regular expression.
    #[error("invalid pattern for field '{field}': {reason}\n  Suggestion: {suggestion}")]
    InvalidPattern {
        /// Field the pattern was meant for
        field: String,
        /// Why compilation failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// The field name is blank.
    #[error("field name must not be empty")]
    EmptyFieldName,
}

impl PatternError {
    /// Creates an `InvalidPattern` error from a regex compilation failure.
    #[must_use]
    pub fn invalid(field: &str, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            field: field.to_string(),
            reason: source.to_string(),
            suggestion: "Check the pattern syntax; use a capture group for the value".to_string(),
        }
    }
}
