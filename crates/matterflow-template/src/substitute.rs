/*
 * substitute.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recursive placeholder substitution.
//!
//! Content may be a string, an array, or an object; anything else passes
//! through unchanged. Three substitution rules apply:
//!
//! - **Strings**: every placeholder is replaced by the textual form of its
//!   resolved value. Strings, numbers, and booleans render verbatim; arrays
//!   and objects render as their canonical JSON serialization.
//! - **Arrays**: elements are substituted recursively. An element that is a
//!   pure `@`-marker placeholder is spliced in place by the live expansion
//!   items, not nested inside another array.
//! - **Objects**: keys and values are both substituted. A value that is a
//!   pure single-placeholder string receives the *typed* resolved value,
//!   preserving JSON-native types inside object contexts.
//!
//! Missing variables are policy, not errors: [`Verbosity::Normal`]
//! substitutes the empty string, [`Verbosity::Verbose`] keeps the
//! placeholder text for debugging. Both are valid production behaviors,
//! selected by configuration.

use serde_json::{Map, Value};

use crate::context::VariableContext;
use crate::error::{TemplateError, TemplateResult};
use crate::placeholder::{PLACEHOLDER_RE, capture_name, is_expansion_path, pure_placeholder};

/// Missing-variable policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Substitute the empty string for unresolvable placeholders.
    #[default]
    Normal,

    /// Leave unresolvable placeholders intact.
    Verbose,
}

/// Substitute placeholders throughout `content`.
pub fn substitute(
    content: &Value,
    context: &VariableContext,
    verbosity: Verbosity,
) -> TemplateResult<Value> {
    let mut referenced = Vec::new();
    subst_value(content, context, verbosity, &mut referenced)
}

/// Like [`substitute`], also returning every variable name referenced, in
/// first-reference order.
pub fn substitute_tracked(
    content: &Value,
    context: &VariableContext,
    verbosity: Verbosity,
) -> TemplateResult<(Value, Vec<String>)> {
    let mut referenced = Vec::new();
    let rendered = subst_value(content, context, verbosity, &mut referenced)?;
    Ok((rendered, referenced))
}

fn subst_value(
    content: &Value,
    context: &VariableContext,
    verbosity: Verbosity,
    referenced: &mut Vec<String>,
) -> TemplateResult<Value> {
    match content {
        Value::String(text) => Ok(Value::String(subst_string(
            text, context, verbosity, referenced,
        )?)),
        Value::Array(items) => subst_array(items, context, verbosity, referenced),
        Value::Object(map) => subst_object(map, context, verbosity, referenced),
        scalar => Ok(scalar.clone()),
    }
}

fn subst_string(
    text: &str,
    context: &VariableContext,
    verbosity: Verbosity,
    referenced: &mut Vec<String>,
) -> TemplateResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        let name = capture_name(&caps);
        record(referenced, name);
        match context.get_value(name) {
            Ok(value) => out.push_str(&stringify(&value)?),
            Err(_) => match verbosity {
                Verbosity::Verbose => out.push_str(whole.as_str()),
                Verbosity::Normal => {}
            },
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn subst_array(
    items: &[Value],
    context: &VariableContext,
    verbosity: Verbosity,
    referenced: &mut Vec<String>,
) -> TemplateResult<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(name) = expansion_sentinel(item) {
            record(referenced, name);
            if let Ok(expansion) = context.expansion_items(name) {
                out.extend(expansion);
                continue;
            }
            // No expansion data: fall through to plain string handling so
            // the verbosity policy decides what remains.
        }
        out.push(subst_value(item, context, verbosity, referenced)?);
    }
    Ok(Value::Array(out))
}

fn subst_object(
    map: &Map<String, Value>,
    context: &VariableContext,
    verbosity: Verbosity,
    referenced: &mut Vec<String>,
) -> TemplateResult<Value> {
    let mut out = Map::new();
    for (key, value) in map {
        let new_key = subst_string(key, context, verbosity, referenced)?;
        let new_value = match value.as_str().and_then(pure_placeholder) {
            Some(name) => {
                record(referenced, name);
                match context.get_value(name) {
                    Ok(resolved) => resolved,
                    Err(_) => match verbosity {
                        Verbosity::Verbose => value.clone(),
                        Verbosity::Normal => Value::String(String::new()),
                    },
                }
            }
            None => subst_value(value, context, verbosity, referenced)?,
        };
        out.insert(new_key, new_value);
    }
    Ok(Value::Object(out))
}

/// An array element that requests the expansion splice: a pure placeholder
/// whose identifier is an `@` path.
fn expansion_sentinel(item: &Value) -> Option<&str> {
    item.as_str()
        .and_then(pure_placeholder)
        .filter(|name| is_expansion_path(name))
}

/// Textual form of a resolved value for string substitution.
fn stringify(value: &Value) -> TemplateResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        composite => serde_json::to_string(composite).map_err(|err| TemplateError::RenderFailed {
            message: err.to_string(),
        }),
    }
}

fn record(referenced: &mut Vec<String>, name: &str) {
    if !referenced.iter().any(|seen| seen == name) {
        referenced.push(name.to_string());
    }
}
