//! Schema cache keyed by resolved path.
//!
//! Append-only, read-mostly. Each key is computed at most once per cache
//! instance; failed loads are not cached. The cache is owned by the
//! pipeline; concurrent pipelines each hold their own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SchemaResult;
use crate::resolver::ResolvedSchema;

/// Caches resolved schemas for the lifetime of a processing run.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<PathBuf, Arc<ResolvedSchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the schema for `path`, computing it with `load` on first access.
    pub fn get_or_insert_with<F>(&mut self, path: &Path, load: F) -> SchemaResult<Arc<ResolvedSchema>>
    where
        F: FnOnce() -> SchemaResult<ResolvedSchema>,
    {
        if let Some(cached) = self.entries.get(path) {
            return Ok(Arc::clone(cached));
        }
        let resolved = Arc::new(load()?);
        self.entries
            .insert(path.to_path_buf(), Arc::clone(&resolved));
        Ok(resolved)
    }

    /// The cached schema for `path`, if already resolved.
    pub fn get(&self, path: &Path) -> Option<Arc<ResolvedSchema>> {
        self.entries.get(path).map(Arc::clone)
    }

    /// Whether `path` has already been resolved.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(marker: &str) -> ResolvedSchema {
        ResolvedSchema {
            content: json!({"marker": marker}),
            resolved_refs: vec![],
        }
    }

    #[test]
    fn loads_once_per_path() {
        let mut cache = SchemaCache::new();
        let path = Path::new("schemas/notes.yaml");
        let mut calls = 0;

        let first = cache
            .get_or_insert_with(path, || {
                calls += 1;
                Ok(resolved("v1"))
            })
            .unwrap();
        let second = cache
            .get_or_insert_with(path, || {
                calls += 1;
                Ok(resolved("v2"))
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(first.content, second.content);
        assert!(cache.contains(path));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = SchemaCache::new();
        let path = Path::new("schemas/broken.yaml");

        let err = cache.get_or_insert_with(path, || {
            Err(crate::error::SchemaError::TooDeep {
                depth: 11,
                max_depth: 10,
            })
        });
        assert!(err.is_err());
        assert!(!cache.contains(path));

        let ok = cache.get_or_insert_with(path, || Ok(resolved("fixed")));
        assert!(ok.is_ok());
    }
}
