//! Per-document evaluation errors.
//!
//! Evaluation over a batch of documents never aborts on a single bad
//! document; instead each failure is recorded as an [`EvalError`] carrying
//! the document's source path, and the caller receives both the partial
//! results and the error list.

use std::path::PathBuf;

use thiserror::Error;

/// What went wrong while evaluating one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    /// The base path of an array expression resolved to a non-array value.
    #[error("expected an array at '{path}', found {actual}")]
    ExpectedArray { path: String, actual: String },
}

/// An evaluation failure tied to the document that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .source_path.display(), .kind)]
pub struct EvalError {
    pub source_path: PathBuf,
    pub kind: EvalErrorKind,
}

impl EvalError {
    pub fn expected_array(
        source_path: impl Into<PathBuf>,
        path: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        EvalError {
            source_path: source_path.into(),
            kind: EvalErrorKind::ExpectedArray {
                path: path.into(),
                actual: actual.into(),
            },
        }
    }
}
