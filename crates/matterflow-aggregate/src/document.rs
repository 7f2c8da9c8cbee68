//! The per-file document type.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// One input document: its frontmatter mapping plus where it came from.
///
/// A `Document` is created once per input file and is immutable afterwards.
/// The pipeline owns documents; the evaluator borrows them for the duration
/// of a run. Key order is the order in which keys appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source: PathBuf,
    data: Map<String, Value>,
}

impl Document {
    /// Create a document from parsed frontmatter.
    pub fn new(source: impl Into<PathBuf>, data: Map<String, Value>) -> Self {
        Document {
            source: source.into(),
            data,
        }
    }

    /// The file this document was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The frontmatter mapping.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The frontmatter as a `Value`, for path navigation.
    pub fn as_value(&self) -> Value {
        Value::Object(self.data.clone())
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
