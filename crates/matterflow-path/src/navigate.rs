//! Safe navigation through `serde_json::Value` trees.
//!
//! Navigation is total: missing keys and non-object values are reported as
//! [`PathError::PathNotFound`], never panics. Only object keys are
//! navigable; array indexing is not part of the path language (arrays are
//! handled by the aggregation evaluator's `[]` notation).

use serde_json::Value;

use crate::error::{PathError, PathResult};
use crate::expression::PathExpression;

/// Walk `keys` through `value`, returning `None` on the first missing or
/// non-navigable segment.
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Extract the value at a simple dot path.
///
/// The empty expression returns `value` unchanged. Expressions containing an
/// array marker are rejected with [`PathError::InvalidExpression`]; use the
/// aggregation evaluator for those.
pub fn evaluate_path<'a>(value: &'a Value, expression: &PathExpression) -> PathResult<&'a Value> {
    let keys = expression.keys().ok_or_else(|| {
        PathError::invalid(expression.raw(), "array marker '[]' is not allowed here")
    })?;
    navigate_keys(value, &keys, expression.raw())
}

/// Like [`lookup`], but reports which segment navigation stopped at.
pub(crate) fn navigate_keys<'a>(
    value: &'a Value,
    keys: &[&str],
    path: &str,
) -> PathResult<&'a Value> {
    let mut current = value;
    for key in keys {
        let next = current.as_object().and_then(|map| map.get(*key));
        match next {
            Some(v) => current = v,
            None => {
                return Err(PathError::PathNotFound {
                    path: path.to_string(),
                    segment: (*key).to_string(),
                });
            }
        }
    }
    Ok(current)
}
