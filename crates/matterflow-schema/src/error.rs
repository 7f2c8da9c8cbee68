//! Error types for schema processing.

use matterflow_path::PathError;
use thiserror::Error;

/// Errors that can occur while resolving or scanning a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A `$ref` chain revisits a target already on the current descent
    /// path. The chain lists every ref followed, in order, ending with the
    /// repeated target.
    #[error("circular schema reference: {}", .chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// Schema nesting exceeded the configured maximum depth.
    #[error("schema nesting too deep: depth {depth} exceeds maximum {max_depth}")]
    TooDeep { depth: usize, max_depth: usize },

    /// An `x-derived-from` annotation carries a malformed path expression.
    #[error("invalid derivation for '{field}': {source}")]
    InvalidDerivation { field: String, source: PathError },

    /// An `x-frontmatter-part` annotation carries a malformed location.
    #[error("invalid hierarchy root: {source}")]
    InvalidHierarchyRoot { source: PathError },
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
