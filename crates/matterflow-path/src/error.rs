//! Error types for path parsing and navigation.

use thiserror::Error;

/// Errors that can occur while parsing or navigating a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path expression is malformed (empty segment, more than one array
    /// marker, a marker where none is allowed, or no marker where one is
    /// required).
    #[error("invalid path expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },

    /// Navigation failed at `segment`: the key is missing or the value at
    /// that point is not an object.
    #[error("path '{path}' not found: cannot navigate into segment '{segment}'")]
    PathNotFound { path: String, segment: String },
}

impl PathError {
    pub(crate) fn invalid(expression: impl Into<String>, message: impl Into<String>) -> Self {
        PathError::InvalidExpression {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;
