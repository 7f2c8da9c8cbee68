//! Parsed path expressions.
//!
//! A path expression is a dot-separated key sequence, optionally containing a
//! single array-notation marker written as a `[]` suffix on a segment:
//!
//! - `title` — one key
//! - `project.name` — nested keys
//! - `commands[].name` — for each element of the array at `commands`, take
//!   `name`
//! - `[].name` — the navigated value itself is the array
//!
//! At most one marker is allowed. Multi-level markers (`a[].b[].c`) have no
//! defined iteration semantics and are rejected during parsing.

use std::fmt;

use crate::error::{PathError, PathResult};

/// One component of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A non-empty object key.
    Key(String),

    /// The `[]` array-notation marker.
    ArrayMarker,
}

impl PathSegment {
    /// The key name, if this segment is a key.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::ArrayMarker => None,
        }
    }
}

/// A parsed, validated path expression.
///
/// Invariant: contains at most one [`PathSegment::ArrayMarker`]. When a
/// marker is present the expression splits cleanly into a (possibly empty)
/// base path before it and a (possibly empty) property path after it; both
/// halves are available via [`PathExpression::base_and_property`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PathExpression {
    /// Parse an expression that may or may not contain an array marker.
    ///
    /// The empty string parses to the empty expression (zero segments),
    /// which navigation treats as "the value itself".
    pub fn parse(input: &str) -> PathResult<Self> {
        let segments = parse_segments(input)?;
        let markers = segments
            .iter()
            .filter(|s| matches!(s, PathSegment::ArrayMarker))
            .count();
        if markers > 1 {
            return Err(PathError::invalid(
                input,
                "at most one array marker '[]' is allowed",
            ));
        }
        Ok(PathExpression {
            raw: input.to_string(),
            segments,
        })
    }

    /// Parse an expression that must contain exactly one array marker.
    ///
    /// This is the form consumed by the aggregation evaluator, which needs
    /// a base array to iterate.
    pub fn parse_aggregate(input: &str) -> PathResult<Self> {
        let expr = Self::parse(input)?;
        if !expr.has_array_marker() {
            return Err(PathError::invalid(
                input,
                "aggregation expressions require an array marker '[]'",
            ));
        }
        Ok(expr)
    }

    /// Parse a plain dot path; array markers are rejected.
    pub fn parse_simple(input: &str) -> PathResult<Self> {
        let expr = Self::parse(input)?;
        if expr.has_array_marker() {
            return Err(PathError::invalid(
                input,
                "array marker '[]' is not allowed here",
            ));
        }
        Ok(expr)
    }

    /// The original expression text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the empty expression.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the expression contains the array marker.
    pub fn has_array_marker(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PathSegment::ArrayMarker))
    }

    /// The key names of a marker-free expression.
    ///
    /// Returns `None` if the expression contains a marker.
    pub fn keys(&self) -> Option<Vec<&str>> {
        self.segments.iter().map(PathSegment::as_key).collect()
    }

    /// Split a marker expression into its base keys and property keys.
    ///
    /// Returns `None` for expressions without a marker. Both halves may be
    /// empty: `[].name` has an empty base, `commands[]` has an empty
    /// property path.
    pub fn base_and_property(&self) -> Option<(Vec<&str>, Vec<&str>)> {
        let marker = self
            .segments
            .iter()
            .position(|s| matches!(s, PathSegment::ArrayMarker))?;
        let base = self.segments[..marker]
            .iter()
            .filter_map(PathSegment::as_key)
            .collect();
        let property = self.segments[marker + 1..]
            .iter()
            .filter_map(PathSegment::as_key)
            .collect();
        Some((base, property))
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split the raw text on dots and classify each piece.
fn parse_segments(input: &str) -> PathResult<Vec<PathSegment>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for piece in input.split('.') {
        if piece.is_empty() {
            return Err(PathError::invalid(input, "empty path segment"));
        }
        if piece == "[]" {
            segments.push(PathSegment::ArrayMarker);
            continue;
        }
        if let Some(key) = piece.strip_suffix("[]") {
            if key.is_empty() || key.contains(['[', ']']) {
                return Err(PathError::invalid(
                    input,
                    format!("malformed array notation in segment '{}'", piece),
                ));
            }
            segments.push(PathSegment::Key(key.to_string()));
            segments.push(PathSegment::ArrayMarker);
            continue;
        }
        if piece.contains(['[', ']']) {
            return Err(PathError::invalid(
                input,
                format!("unexpected bracket in segment '{}'", piece),
            ));
        }
        segments.push(PathSegment::Key(piece.to_string()));
    }
    Ok(segments)
}
