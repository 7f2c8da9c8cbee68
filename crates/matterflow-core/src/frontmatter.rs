//! YAML frontmatter extraction.
//!
//! Frontmatter is a YAML block fenced by `---` lines at the very start of a
//! document; the closing fence may also be `...`. Files without a leading
//! fence carry no frontmatter and yield no document.

use std::path::Path;

use serde_json::{Map, Value};

use matterflow_aggregate::Document;

use crate::error::{CoreError, CoreResult};

/// Return the raw YAML between the frontmatter fences, if any.
pub fn extract_frontmatter(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;

    for (offset, line) in line_offsets(rest) {
        let trimmed = line.trim_end_matches('\r');
        if trimmed == "---" || trimmed == "..." {
            return Some(&rest[..offset]);
        }
    }
    None
}

/// Parse one source file into a [`Document`].
///
/// Returns `Ok(None)` when the file has no frontmatter block or the block
/// is not a YAML mapping; YAML syntax errors are reported.
pub fn parse_document(path: &Path, text: &str) -> CoreResult<Option<Document>> {
    let Some(raw) = extract_frontmatter(text) else {
        return Ok(None);
    };
    let value: Value =
        serde_yaml::from_str(raw).map_err(|source| CoreError::InvalidFrontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    let data: Map<String, Value> = match value {
        Value::Object(map) => map,
        // An empty frontmatter block parses as null; treat it as empty.
        Value::Null => Map::new(),
        _ => return Ok(None),
    };
    Ok(Some(Document::new(path, data)))
}

fn line_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n')
        .scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, line.trim_end_matches('\n')))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_block_between_fences() {
        let text = "---\ntitle: hello\ntags: [a, b]\n---\nbody text\n";
        assert_eq!(extract_frontmatter(text), Some("title: hello\ntags: [a, b]\n"));
    }

    #[test]
    fn accepts_dots_as_closing_fence() {
        let text = "---\ntitle: hello\n...\nbody\n";
        assert_eq!(extract_frontmatter(text), Some("title: hello\n"));
    }

    #[test]
    fn no_leading_fence_means_no_frontmatter() {
        assert_eq!(extract_frontmatter("title: hello\n---\n"), None);
        assert_eq!(extract_frontmatter(""), None);
        assert_eq!(extract_frontmatter("body only"), None);
    }

    #[test]
    fn unclosed_fence_means_no_frontmatter() {
        assert_eq!(extract_frontmatter("---\ntitle: hello\nbody"), None);
    }

    #[test]
    fn parse_document_builds_ordered_mapping() {
        let doc = parse_document(
            Path::new("a.md"),
            "---\nz: 1\na: 2\n---\nbody\n",
        )
        .unwrap()
        .unwrap();
        let keys: Vec<&String> = doc.data().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(doc.get("z"), Some(&json!(1)));
    }

    #[test]
    fn parse_document_without_frontmatter_is_none() {
        let doc = parse_document(Path::new("a.md"), "plain body\n").unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn empty_frontmatter_block_is_an_empty_document() {
        let doc = parse_document(Path::new("a.md"), "---\n---\nbody\n")
            .unwrap()
            .unwrap();
        assert!(doc.data().is_empty());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = parse_document(Path::new("a.md"), "---\n{unclosed\n---\n");
        assert!(matches!(
            result,
            Err(CoreError::InvalidFrontmatter { .. })
        ));
    }

    #[test]
    fn windows_line_endings_are_tolerated() {
        let text = "---\r\ntitle: hello\r\n---\r\nbody\r\n";
        let doc = parse_document(Path::new("a.md"), text).unwrap().unwrap();
        assert_eq!(doc.get("title"), Some(&json!("hello")));
    }
}
