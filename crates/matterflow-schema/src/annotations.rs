//! Scanning schemas for `x-` extension annotations.
//!
//! Annotations live on property schemas inside the usual JSON Schema
//! structure (`properties` maps, `items` schemas). The scan walks that
//! structure and collects:
//!
//! - derivation rules (`x-derived-from`, `x-derived-unique`,
//!   `x-merge-arrays`)
//! - the hierarchy root (`x-frontmatter-part`)
//! - the template binding (`x-template`, `x-template-format`)
//!
//! The scan is permissive about unknown or oddly-typed annotation values
//! (they are ignored), but a malformed path expression inside
//! `x-derived-from` is a structural error: it would otherwise surface much
//! later, mid-aggregation.

use serde_json::{Map, Value};

use matterflow_aggregate::{MergeConfig, MergeStrategy};
use matterflow_path::PathExpression;

use crate::error::{SchemaError, SchemaResult};

pub const X_DERIVED_FROM: &str = "x-derived-from";
pub const X_DERIVED_UNIQUE: &str = "x-derived-unique";
pub const X_FRONTMATTER_PART: &str = "x-frontmatter-part";
pub const X_MERGE_ARRAYS: &str = "x-merge-arrays";
pub const X_TEMPLATE: &str = "x-template";
pub const X_TEMPLATE_FORMAT: &str = "x-template-format";

/// One `x-derived-from` rule: compute the field at `field_path` by
/// evaluating `expression` over the document batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationRule {
    /// Dotted location of the annotated property within the schema's
    /// property tree.
    pub field_path: String,
    /// The aggregation expression to evaluate.
    pub expression: PathExpression,
    /// Deduplicate the collected values (`x-derived-unique`).
    pub unique: bool,
    /// Merge configuration when the collected values are arrays
    /// (`x-merge-arrays`).
    pub merge: Option<MergeConfig>,
}

/// The schema location annotated `x-frontmatter-part`.
///
/// Its array value is the sole origin of array-expansion (`@items`) data for
/// templates bound to this schema.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyRoot {
    pub location: PathExpression,
}

/// Template binding declared on the schema root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinding {
    /// Template path or inline name (`x-template`).
    pub template: String,
    /// Declared output format (`x-template-format`), if any.
    pub format: Option<String>,
}

/// Everything the annotation scan found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationScan {
    pub derivations: Vec<DerivationRule>,
    pub hierarchy_root: Option<HierarchyRoot>,
    pub template: Option<TemplateBinding>,
}

impl AnnotationScan {
    /// Whether any aggregation work is needed for this schema.
    pub fn needs_aggregation(&self) -> bool {
        !self.derivations.is_empty()
    }
}

/// Scan a (resolved) schema tree for extension annotations.
pub fn scan(schema: &Value) -> SchemaResult<AnnotationScan> {
    let mut result = AnnotationScan::default();

    if let Some(map) = schema.as_object() {
        if let Some(Value::String(template)) = map.get(X_TEMPLATE) {
            let format = match map.get(X_TEMPLATE_FORMAT) {
                Some(Value::String(f)) => Some(f.clone()),
                _ => None,
            };
            result.template = Some(TemplateBinding {
                template: template.clone(),
                format,
            });
        }
    }

    walk(schema, &mut Vec::new(), &mut result)?;
    Ok(result)
}

fn walk(node: &Value, path: &mut Vec<String>, result: &mut AnnotationScan) -> SchemaResult<()> {
    let Some(map) = node.as_object() else {
        return Ok(());
    };

    visit_annotations(map, path, result)?;

    if let Some(Value::Object(properties)) = map.get("properties") {
        for (name, subschema) in properties {
            path.push(name.clone());
            walk(subschema, path, result)?;
            path.pop();
        }
    }
    if let Some(items) = map.get("items") {
        walk(items, path, result)?;
    }
    Ok(())
}

fn visit_annotations(
    map: &Map<String, Value>,
    path: &[String],
    result: &mut AnnotationScan,
) -> SchemaResult<()> {
    let field_path = path.join(".");

    if let Some(Value::String(raw)) = map.get(X_DERIVED_FROM) {
        let expression = PathExpression::parse_aggregate(raw).map_err(|source| {
            SchemaError::InvalidDerivation {
                field: field_path.clone(),
                source,
            }
        })?;
        result.derivations.push(DerivationRule {
            field_path: field_path.clone(),
            expression,
            unique: matches!(map.get(X_DERIVED_UNIQUE), Some(Value::Bool(true))),
            merge: merge_config(map.get(X_MERGE_ARRAYS)),
        });
    }

    if matches!(map.get(X_FRONTMATTER_PART), Some(Value::Bool(true))) && result.hierarchy_root.is_none()
    {
        let location = PathExpression::parse_simple(&field_path)
            .map_err(|source| SchemaError::InvalidHierarchyRoot { source })?;
        result.hierarchy_root = Some(HierarchyRoot { location });
    }

    Ok(())
}

/// Interpret an `x-merge-arrays` value. `true` selects flattening with
/// default flags; a string selects a strategy by name; anything else means
/// no merging.
fn merge_config(value: Option<&Value>) -> Option<MergeConfig> {
    match value {
        Some(Value::Bool(true)) => Some(MergeConfig::flatten()),
        Some(Value::String(selector)) => {
            MergeStrategy::from_selector(selector).map(|strategy| MergeConfig {
                strategy,
                ..MergeConfig::default()
            })
        }
        _ => None,
    }
}
