//! Error type for the orchestration layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Schema(#[from] matterflow_schema::SchemaError),

    #[error(transparent)]
    Template(#[from] matterflow_template::TemplateError),

    #[error(transparent)]
    Path(#[from] matterflow_path::PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema not found: {}", .path.display())]
    SchemaNotFound { path: PathBuf },

    #[error("template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("no template bound: schema has no x-template and no override was given")]
    NoTemplate,

    #[error("invalid frontmatter in {}: {source}", .path.display())]
    InvalidFrontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for orchestration operations.
pub type CoreResult<T> = Result<T, CoreError>;
