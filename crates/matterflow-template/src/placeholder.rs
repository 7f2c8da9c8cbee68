/*
 * placeholder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder syntax.
//!
//! A placeholder is `{identifier}` or `{{identifier}}` where `identifier`
//! matches `[A-Za-z0-9_.@-]+`. Dotted identifiers denote nested paths; a
//! leading `@` denotes the array-expansion marker.

use once_cell::sync::Lazy;
use regex::Regex;

/// The canonical array-expansion marker used in templates.
pub const EXPANSION_MARKER: &str = "@items";

/// Matches every placeholder occurrence in a string. The double-brace
/// alternative comes first so `{{name}}` is not consumed as `{` + `{name}`.
pub(crate) static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_.@-]+)\}\}|\{([A-Za-z0-9_.@-]+)\}")
        .expect("placeholder pattern is valid")
});

/// Matches a string that is exactly one placeholder and nothing else.
static PURE_PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\{\{([A-Za-z0-9_.@-]+)\}\}|\{([A-Za-z0-9_.@-]+)\})$")
        .expect("pure placeholder pattern is valid")
});

/// Extract the variable name from a capture (single- or double-brace arm).
pub(crate) fn capture_name<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// If `text` is a pure single-placeholder string, return the variable name.
pub(crate) fn pure_placeholder(text: &str) -> Option<&str> {
    PURE_PLACEHOLDER_RE
        .captures(text)
        .map(|caps| capture_name(&caps))
        .filter(|name| !name.is_empty())
}

/// Whether `name` addresses the array-expansion marker.
pub(crate) fn is_expansion_path(name: &str) -> bool {
    name.starts_with('@')
}
