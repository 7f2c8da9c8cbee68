/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for variable resolution and template rendering.

use thiserror::Error;

/// Why a variable lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Dot navigation stopped at a missing or non-navigable segment.
    #[error("variable '{path}' not found: cannot navigate segment '{segment}'")]
    PathNotFound { path: String, segment: String },

    /// An `@` path was used in a context with no array-expansion data.
    #[error("'{path}' requested array-expansion data, but none is available")]
    ArrayDataNotAvailable { path: String },
}

/// Errors that can occur during template operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A variable context could not be constructed from the given data.
    #[error("data composition failed: {message}")]
    DataCompositionFailed { message: String },

    /// A required variable could not be resolved.
    #[error("variable resolution failed: {source}")]
    VariableResolutionFailed {
        #[from]
        source: ResolutionError,
    },

    /// Rendering produced unserializable output.
    #[error("render failed: {message}")]
    RenderFailed { message: String },
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
