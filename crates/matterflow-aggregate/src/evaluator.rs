//! Array-notation path evaluation over document collections.
//!
//! Given an expression like `commands[].name`, the evaluator resolves the
//! base path (`commands`) in each document, iterates the array found there,
//! and extracts the property path (`name`) from each element. Results are
//! collected in document order, then element order.
//!
//! Failure policy: a document whose base path resolves to a non-array value
//! contributes an [`EvalError`] and the batch continues. A missing property
//! on an individual element is silently skipped — partial records across
//! heterogeneous documents are expected, not exceptional.

use std::collections::HashSet;

use serde_json::Value;

use matterflow_path::{PathExpression, lookup};

use crate::document::Document;
use crate::error::EvalError;

/// The outcome of evaluating one expression over a batch of documents:
/// partial results and the per-document error trail, side by side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub values: Vec<Value>,
    pub errors: Vec<EvalError>,
}

impl Evaluation {
    /// True if at least one document failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Evaluate an array-notation expression over every document.
///
/// The expression must contain the array marker; construct it with
/// [`PathExpression::parse_aggregate`] so malformed expressions are rejected
/// before evaluation starts.
pub fn evaluate(documents: &[Document], expression: &PathExpression) -> Evaluation {
    let Some((base, property)) = expression.base_and_property() else {
        // parse_aggregate guarantees a marker; a marker-free expression can
        // only reach here through PathExpression::parse, and then there is
        // nothing to iterate.
        return Evaluation::default();
    };

    let mut result = Evaluation::default();
    for doc in documents {
        let data = doc.as_value();
        // Empty base means the whole document is the array (it never is for
        // frontmatter objects, but the contract is total either way).
        let Some(resolved) = lookup(&data, &base) else {
            result.errors.push(EvalError::expected_array(
                doc.source(),
                expression.raw(),
                "nothing",
            ));
            continue;
        };
        let Some(elements) = resolved.as_array() else {
            result.errors.push(EvalError::expected_array(
                doc.source(),
                expression.raw(),
                value_type_name(resolved),
            ));
            continue;
        };
        for element in elements {
            if property.is_empty() {
                result.values.push(element.clone());
            } else if let Some(extracted) = lookup(element, &property) {
                result.values.push(extracted.clone());
            }
        }
    }
    result
}

/// [`evaluate`], then drop structural duplicates preserving first-occurrence
/// order. Objects and arrays are compared by their serialized form.
pub fn evaluate_unique(documents: &[Document], expression: &PathExpression) -> Evaluation {
    let mut result = evaluate(documents, expression);
    let mut seen = HashSet::new();
    result
        .values
        .retain(|value| seen.insert(structural_key(value)));
    result
}

/// Canonical serialization used as the dedupe key.
fn structural_key(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Human-readable type name for error messages.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
