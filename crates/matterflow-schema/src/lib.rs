//! Schema handling for Matterflow.
//!
//! Matterflow schemas are ordinary JSON Schema documents extended with
//! `x-` properties that drive aggregation and templating:
//!
//! - `x-derived-from`: a path expression computing a field's value from
//!   other documents' data
//! - `x-derived-unique`: deduplicate the derived values
//! - `x-merge-arrays`: merge strategy for derived arrays
//! - `x-frontmatter-part`: marks the hierarchy root whose array supplies
//!   array-expansion data to templates
//! - `x-template` / `x-template-format`: template binding
//!
//! This crate scans schema trees for those annotations
//! ([`annotations::scan`]), expands `$ref` pointers with cycle and depth
//! protection ([`RefResolver`]), and caches resolved schemas by path
//! ([`SchemaCache`]). Structural validation (types, required fields) is not
//! this crate's concern.

pub mod annotations;
pub mod cache;
pub mod error;
pub mod resolver;

pub use annotations::{
    AnnotationScan, DerivationRule, HierarchyRoot, TemplateBinding, scan,
};
pub use cache::SchemaCache;
pub use error::{SchemaError, SchemaResult};
pub use resolver::{
    DEFAULT_MAX_DEPTH, MemoryRefLoader, NullRefLoader, RefLoader, RefResolver, ResolvedSchema,
};
