//! Pipeline orchestration for Matterflow.
//!
//! The engine crates (`matterflow-path`, `matterflow-aggregate`,
//! `matterflow-schema`, `matterflow-template`) are pure and perform no I/O.
//! This crate owns everything around them:
//!
//! - frontmatter extraction from Markdown sources ([`frontmatter`])
//! - providers that load documents, schemas, and templates from the file
//!   system or from memory ([`provider`])
//! - the orchestrating [`Pipeline`] that resolves the schema, runs
//!   aggregation, composes a variable context, and drives substitution
//! - output writers that serialize rendered content as JSON, YAML, XML, or
//!   Markdown ([`writer`])
//!
//! User-visible reporting stays in the CLI; this crate logs progress through
//! `tracing` and returns typed results.

pub mod error;
pub mod frontmatter;
pub mod pipeline;
pub mod provider;
pub mod writer;

pub use error::{CoreError, CoreResult};
pub use frontmatter::{extract_frontmatter, parse_document};
pub use pipeline::{Pipeline, RenderReport};
pub use provider::{
    DocumentProvider, FileSystemDocumentProvider, FileSystemSchemaProvider,
    FileSystemTemplateProvider, MemoryDocumentProvider, MemorySchemaProvider,
    MemoryTemplateProvider, SchemaProvider, TemplateProvider,
};
pub use writer::write_output;
