/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable contexts: the data scope a template is rendered against.
//!
//! A context is one of three scopes, and every consumer matches all three —
//! there is no "defaulted" scope that silently behaves like another:
//!
//! - [`VariableContext::Single`]: one document's data, no array-expansion
//!   capability.
//! - [`VariableContext::Composed`]: a main mapping plus optional aggregated
//!   array data from multi-document composition.
//! - [`VariableContext::ArrayExpansion`]: purely an array of per-item data,
//!   used while rendering repeated template fragments.
//!
//! Contexts are cheap, immutable views: a new context is created per
//! document or per array item, never mutated in place.

use serde_json::Value;

use matterflow_path::{PathExpression, lookup};

use crate::error::{ResolutionError, TemplateError, TemplateResult};
use crate::placeholder::is_expansion_path;

/// Whether aggregated array data is present in a composed context.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Available(Vec<Value>),
    NotAvailable,
}

/// The data scope for one render.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableContext {
    /// Plain per-document data.
    Single { data: Value },

    /// Multi-document composition: main data plus optional array data.
    /// `hierarchy_root` names where in the main data the expansion array
    /// lives when no explicit array data was supplied.
    Composed {
        data: Value,
        array_data: ArrayData,
        hierarchy_root: Option<PathExpression>,
    },

    /// Per-item data for repeated template fragments.
    ArrayExpansion { items: Vec<Value> },
}

impl VariableContext {
    /// Context over one document's data. Fails unless `data` is an object.
    pub fn single(data: Value) -> TemplateResult<Self> {
        require_object(&data)?;
        Ok(VariableContext::Single { data })
    }

    /// Context over composed multi-document data.
    pub fn composed(
        data: Value,
        array_data: ArrayData,
        hierarchy_root: Option<PathExpression>,
    ) -> TemplateResult<Self> {
        require_object(&data)?;
        Ok(VariableContext::Composed {
            data,
            array_data,
            hierarchy_root,
        })
    }

    /// Context over array-expansion items.
    pub fn array_expansion(items: Vec<Value>) -> Self {
        VariableContext::ArrayExpansion { items }
    }

    /// Resolve a variable path within this scope.
    ///
    /// Paths starting with `@` resolve only the reserved array-expansion
    /// marker; all other paths dot-navigate the base mapping. Never panics,
    /// never returns an ambient null.
    pub fn get_value(&self, path: &str) -> Result<Value, ResolutionError> {
        if is_expansion_path(path) {
            return self.expansion_items(path).map(Value::Array);
        }
        match self {
            VariableContext::Single { data } => navigate(data, path),
            VariableContext::Composed { data, .. } => navigate(data, path),
            VariableContext::ArrayExpansion { .. } => Err(ResolutionError::PathNotFound {
                path: path.to_string(),
                segment: first_segment(path),
            }),
        }
    }

    /// The live expansion items, if this scope has any.
    ///
    /// In a composed scope without explicit array data, the hierarchy root
    /// is consulted as a fallback: if the main data holds an array at that
    /// location, it supplies the items.
    pub fn expansion_items(&self, path: &str) -> Result<Vec<Value>, ResolutionError> {
        let unavailable = || ResolutionError::ArrayDataNotAvailable {
            path: path.to_string(),
        };
        match self {
            VariableContext::Single { .. } => Err(unavailable()),
            VariableContext::Composed {
                data,
                array_data,
                hierarchy_root,
            } => match array_data {
                ArrayData::Available(items) => Ok(items.clone()),
                ArrayData::NotAvailable => hierarchy_root
                    .as_ref()
                    .and_then(|root| root.keys())
                    .and_then(|keys| lookup(data, &keys))
                    .and_then(Value::as_array)
                    .map(|items| items.to_vec())
                    .ok_or_else(unavailable),
            },
            VariableContext::ArrayExpansion { items } => Ok(items.clone()),
        }
    }
}

fn require_object(data: &Value) -> TemplateResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(TemplateError::DataCompositionFailed {
            message: "context base data must be an object".to_string(),
        })
    }
}

fn navigate(data: &Value, path: &str) -> Result<Value, ResolutionError> {
    let keys: Vec<&str> = path.split('.').collect();
    let mut current = data;
    for key in &keys {
        if key.is_empty() {
            return Err(ResolutionError::PathNotFound {
                path: path.to_string(),
                segment: (*key).to_string(),
            });
        }
        match current.as_object().and_then(|map| map.get(*key)) {
            Some(next) => current = next,
            None => {
                return Err(ResolutionError::PathNotFound {
                    path: path.to_string(),
                    segment: (*key).to_string(),
                });
            }
        }
    }
    Ok(current.clone())
}

fn first_segment(path: &str) -> String {
    path.split('.').next().unwrap_or(path).to_string()
}
