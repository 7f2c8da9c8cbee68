//! `$ref` expansion with cycle detection and a depth bound.
//!
//! The resolver walks a schema tree and follows every key literally named
//! `$ref` whose value is a string. Two guards protect the walk:
//!
//! - a `visited` chain of ref targets, threaded by value through the
//!   recursion (sibling branches do not see each other's refs); revisiting a
//!   target on the current path fails with the full chain for diagnostics
//! - a depth counter incremented once per descent into a nested object;
//!   exceeding the maximum (default 10) fails
//!
//! Without a [`RefLoader`] the resolver treats ref bodies as opaque
//! pointers: targets are recorded in `resolved_refs` but nothing is
//! inlined. With a loader, the target schema is fetched, walked under the
//! extended visited chain, and merged over the referencing object's other
//! keys (the sibling keys win).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};

/// Key that introduces a schema reference.
pub const REF_KEY: &str = "$ref";

/// Default bound on nested-object depth during resolution.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A schema with its references expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// The walked schema content.
    pub content: Value,
    /// Every ref target followed, in first-visit order.
    pub resolved_refs: Vec<String>,
}

/// Supplies the body of a referenced schema.
pub trait RefLoader {
    /// Load the schema identified by `target`, or `None` if unknown.
    fn load(&self, target: &str) -> Option<Value>;
}

/// Loader that knows nothing; refs stay opaque pointers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRefLoader;

impl RefLoader for NullRefLoader {
    fn load(&self, _target: &str) -> Option<Value> {
        None
    }
}

/// Loader backed by an in-memory map, for tests and bundled schemas.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefLoader {
    schemas: HashMap<String, Value>,
}

impl MemoryRefLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: impl Into<String>, schema: Value) -> &mut Self {
        self.schemas.insert(target.into(), schema);
        self
    }
}

impl RefLoader for MemoryRefLoader {
    fn load(&self, target: &str) -> Option<Value> {
        self.schemas.get(target).cloned()
    }
}

/// Walks schema trees and expands `$ref` pointers.
pub struct RefResolver<L = NullRefLoader> {
    max_depth: usize,
    loader: L,
}

impl RefResolver<NullRefLoader> {
    /// Resolver with the default depth bound and no loader.
    pub fn new() -> Self {
        RefResolver {
            max_depth: DEFAULT_MAX_DEPTH,
            loader: NullRefLoader,
        }
    }
}

impl Default for RefResolver<NullRefLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: RefLoader> RefResolver<L> {
    /// Resolver with a loader that can inline referenced schema bodies.
    pub fn with_loader(loader: L) -> Self {
        RefResolver {
            max_depth: DEFAULT_MAX_DEPTH,
            loader,
        }
    }

    /// Override the depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve all references in `schema`.
    pub fn resolve(&self, schema: &Value) -> SchemaResult<ResolvedSchema> {
        let mut resolved_refs = Vec::new();
        let content = self.walk(schema, Vec::new(), 0, &mut resolved_refs)?;
        Ok(ResolvedSchema {
            content,
            resolved_refs,
        })
    }

    /// Recursive descent. `visited` is owned by this call; children receive
    /// clones, so detection is per-path, not global.
    fn walk(
        &self,
        node: &Value,
        visited: Vec<String>,
        depth: usize,
        resolved_refs: &mut Vec<String>,
    ) -> SchemaResult<Value> {
        if depth > self.max_depth {
            return Err(SchemaError::TooDeep {
                depth,
                max_depth: self.max_depth,
            });
        }

        match node {
            Value::Object(map) => self.walk_object(map, visited, depth, resolved_refs),
            Value::Array(items) => {
                // Element-wise, same depth: arrays group schemas, they do
                // not nest them.
                let walked: SchemaResult<Vec<Value>> = items
                    .iter()
                    .map(|item| self.walk(item, visited.clone(), depth, resolved_refs))
                    .collect();
                Ok(Value::Array(walked?))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn walk_object(
        &self,
        map: &Map<String, Value>,
        mut visited: Vec<String>,
        depth: usize,
        resolved_refs: &mut Vec<String>,
    ) -> SchemaResult<Value> {
        let mut inlined: Option<Value> = None;

        if let Some(Value::String(target)) = map.get(REF_KEY) {
            if visited.iter().any(|seen| seen == target) {
                let mut chain = visited;
                chain.push(target.clone());
                return Err(SchemaError::CircularReference { chain });
            }
            visited.push(target.clone());
            if !resolved_refs.contains(target) {
                resolved_refs.push(target.clone());
            }
            if let Some(body) = self.loader.load(target) {
                inlined = Some(self.walk(&body, visited.clone(), depth, resolved_refs)?);
            }
        }

        let inlined_ref = inlined.is_some();
        let mut out = Map::new();
        if let Some(Value::Object(body)) = inlined {
            out.extend(body);
        }
        for (key, value) in map {
            if key == REF_KEY && inlined_ref {
                // The pointer was replaced by its body; drop the key.
                continue;
            }
            let walked = match value {
                Value::Object(_) => self.walk(value, visited.clone(), depth + 1, resolved_refs)?,
                _ => self.walk(value, visited.clone(), depth, resolved_refs)?,
            };
            out.insert(key.clone(), walked);
        }
        Ok(Value::Object(out))
    }
}
