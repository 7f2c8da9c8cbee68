/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendered output and its bookkeeping.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde_json::Value;

use crate::context::VariableContext;
use crate::error::TemplateResult;
use crate::substitute::{Verbosity, substitute_tracked};

/// Declared output format of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFormat {
    #[default]
    Json,
    Yaml,
    Xml,
    Markdown,
}

impl TemplateFormat {
    /// Infer a format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(TemplateFormat::Json),
            "yaml" | "yml" => Some(TemplateFormat::Yaml),
            "xml" => Some(TemplateFormat::Xml),
            "md" | "markdown" => Some(TemplateFormat::Markdown),
            _ => None,
        }
    }
}

impl FromStr for TemplateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(TemplateFormat::Json),
            "yaml" | "yml" => Ok(TemplateFormat::Yaml),
            "xml" => Ok(TemplateFormat::Xml),
            "markdown" | "md" => Ok(TemplateFormat::Markdown),
            other => Err(format!("unknown template format '{}'", other)),
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateFormat::Json => "json",
            TemplateFormat::Yaml => "yaml",
            TemplateFormat::Xml => "xml",
            TemplateFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// The result of one render call: the substituted content plus bookkeeping.
/// Produced once per render; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub content: Value,
    pub format: TemplateFormat,
    pub rendered_at: SystemTime,
    /// Variable names referenced during substitution, in first-reference
    /// order.
    pub variables: Vec<String>,
}

/// Substitute `template` against `context` and wrap the result with its
/// bookkeeping.
pub fn render(
    template: &Value,
    context: &VariableContext,
    verbosity: Verbosity,
    format: TemplateFormat,
) -> TemplateResult<RenderedOutput> {
    let (content, variables) = substitute_tracked(template, context, verbosity)?;
    Ok(RenderedOutput {
        content,
        format,
        rendered_at: SystemTime::now(),
        variables,
    })
}
