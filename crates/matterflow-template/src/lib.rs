/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template substitution engine for Matterflow.
//!
//! This crate renders templates by replacing variable placeholders with
//! values resolved from a [`VariableContext`]. It supports:
//!
//! - Placeholders: `{variable}` or `{{variable}}`
//! - Nested field access: `{project.name}`
//! - The array-expansion marker: `{@items}`
//! - Three data scopes: single document, composed multi-document, and
//!   array-expansion
//! - Two missing-variable policies: [`Verbosity::Normal`] (substitute the
//!   empty string) and [`Verbosity::Verbose`] (keep the placeholder text)
//!
//! # Architecture
//!
//! The engine is independent of how templates and documents are loaded.
//! Content is a `serde_json::Value` (string, array, or object); substitution
//! is a pure recursive descent with no shared mutable state across calls.
//!
//! # Example
//!
//! ```
//! use matterflow_template::{VariableContext, Verbosity, substitute};
//! use serde_json::json;
//!
//! let ctx = VariableContext::single(json!({"id": {"full": "X1"}})).unwrap();
//! let rendered = substitute(&json!({"v": "{{id.full}}"}), &ctx, Verbosity::Normal).unwrap();
//! assert_eq!(rendered, json!({"v": "X1"}));
//! ```

pub mod context;
pub mod error;
pub mod output;
pub mod placeholder;
pub mod substitute;

pub use context::{ArrayData, VariableContext};
pub use error::{ResolutionError, TemplateError, TemplateResult};
pub use output::{RenderedOutput, TemplateFormat, render};
pub use placeholder::EXPANSION_MARKER;
pub use substitute::{Verbosity, substitute, substitute_tracked};
