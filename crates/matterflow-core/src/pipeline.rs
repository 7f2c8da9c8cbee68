//! The orchestrating pipeline.
//!
//! One run: load and resolve the schema, scan its annotations, load the
//! documents, aggregate derived values, compose a variable context, and
//! drive the substitution engine against the template. The pipeline owns
//! the schema cache and all logging; the engine crates stay pure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use matterflow_aggregate::{
    Document, EvalError, MergedData, evaluate, evaluate_unique, merge,
};
use matterflow_path::lookup;
use matterflow_schema::{
    AnnotationScan, HierarchyRoot, RefResolver, ResolvedSchema, SchemaCache, scan,
};
use matterflow_template::{
    ArrayData, RenderedOutput, TemplateFormat, VariableContext, Verbosity, render,
};

use crate::error::{CoreError, CoreResult};
use crate::provider::{DocumentProvider, SchemaProvider, TemplateProvider};

/// Everything one run produced: the rendered output plus the evaluation
/// error trail and resolution bookkeeping.
#[derive(Debug)]
pub struct RenderReport {
    pub output: RenderedOutput,
    /// Per-document aggregation errors. These did not abort the run; the
    /// caller decides whether they are fatal.
    pub eval_errors: Vec<EvalError>,
    pub resolved_refs: Vec<String>,
    pub document_count: usize,
}

/// Drives one or more processing runs, caching resolved schemas by path.
pub struct Pipeline {
    resolver: RefResolver,
    cache: SchemaCache,
    verbosity: Verbosity,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            resolver: RefResolver::new(),
            cache: SchemaCache::new(),
            verbosity: Verbosity::Normal,
        }
    }

    /// Select the missing-variable policy for substitution.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Run the full pipeline against providers.
    ///
    /// The template comes from `template_override` when given, otherwise
    /// from the schema's `x-template` binding (resolved relative to the
    /// schema file). The output format is decided by, in order:
    /// `format_override`, the schema's `x-template-format`, the template
    /// provider's declared format, then JSON.
    pub fn run(
        &mut self,
        schema_path: &Path,
        schemas: &dyn SchemaProvider,
        documents: &dyn DocumentProvider,
        templates: &dyn TemplateProvider,
        template_override: Option<&Path>,
        format_override: Option<TemplateFormat>,
    ) -> CoreResult<RenderReport> {
        let resolved = self.resolved_schema(schema_path, schemas)?;
        tracing::debug!(
            schema = %schema_path.display(),
            refs = resolved.resolved_refs.len(),
            "Resolved schema references"
        );

        let annotations = scan(&resolved.content)?;
        let docs = documents.load_documents()?;
        tracing::debug!(
            documents = docs.len(),
            derivations = annotations.derivations.len(),
            "Loaded documents"
        );

        let template_path = match template_override {
            Some(path) => path.to_path_buf(),
            None => {
                let binding = annotations.template.as_ref().ok_or(CoreError::NoTemplate)?;
                resolve_sibling(schema_path, &binding.template)
            }
        };
        let (template_content, declared_format) = templates.load_template(&template_path)?;

        let format = format_override
            .or_else(|| {
                annotations
                    .template
                    .as_ref()
                    .and_then(|b| b.format.as_deref())
                    .and_then(|f| f.parse().ok())
            })
            .or(declared_format)
            .unwrap_or_default();

        let report = self.render_parsed(&resolved, &annotations, &docs, &template_content, format)?;
        tracing::info!(
            format = %format,
            variables = report.output.variables.len(),
            errors = report.eval_errors.len(),
            "Rendered template"
        );
        Ok(report)
    }

    /// Run aggregation and substitution over already-loaded inputs.
    pub fn render_parsed(
        &self,
        resolved: &ResolvedSchema,
        annotations: &AnnotationScan,
        documents: &[Document],
        template: &Value,
        format: TemplateFormat,
    ) -> CoreResult<RenderReport> {
        let (aggregated, eval_errors) = aggregate(annotations, documents);
        let context = compose_context(annotations, documents, aggregated)?;
        let output = render(template, &context, self.verbosity, format)?;
        Ok(RenderReport {
            output,
            eval_errors,
            resolved_refs: resolved.resolved_refs.clone(),
            document_count: documents.len(),
        })
    }

    fn resolved_schema(
        &mut self,
        path: &Path,
        schemas: &dyn SchemaProvider,
    ) -> CoreResult<Arc<ResolvedSchema>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(cached);
        }
        let raw = schemas.load_schema(path)?;
        let resolver = &self.resolver;
        Ok(self.cache.get_or_insert_with(path, || resolver.resolve(&raw))?)
    }
}

/// Evaluate every derivation rule, building the aggregated value mapping
/// and the combined per-document error trail.
fn aggregate(
    annotations: &AnnotationScan,
    documents: &[Document],
) -> (Map<String, Value>, Vec<EvalError>) {
    let mut data = Map::new();
    let mut errors = Vec::new();
    for rule in &annotations.derivations {
        let evaluation = if rule.unique {
            evaluate_unique(documents, &rule.expression)
        } else {
            evaluate(documents, &rule.expression)
        };
        tracing::debug!(
            field = %rule.field_path,
            expression = %rule.expression,
            values = evaluation.values.len(),
            errors = evaluation.errors.len(),
            "Evaluated derivation"
        );
        errors.extend(evaluation.errors);

        let value = match &rule.merge {
            Some(config) => merged_to_value(merge(&evaluation.values, config).data),
            None => Value::Array(evaluation.values),
        };
        insert_at_path(&mut data, &rule.field_path, value);
    }
    (data, errors)
}

/// Build the variable context for this run.
///
/// A single document with no aggregation work renders in the plain
/// per-document scope. Everything else renders in the composed scope:
/// the main mapping is the lone document's data (if there is exactly one)
/// overlaid with the aggregated values, and array-expansion data comes from
/// the hierarchy root across all documents.
fn compose_context(
    annotations: &AnnotationScan,
    documents: &[Document],
    aggregated: Map<String, Value>,
) -> CoreResult<VariableContext> {
    let single_scope = documents.len() == 1
        && !annotations.needs_aggregation()
        && annotations.hierarchy_root.is_none();
    if single_scope {
        return Ok(VariableContext::single(documents[0].as_value())?);
    }

    let mut data = if documents.len() == 1 {
        documents[0].data().clone()
    } else {
        Map::new()
    };
    for (key, value) in aggregated {
        data.insert(key, value);
    }

    let array_data = match &annotations.hierarchy_root {
        Some(root) => expansion_data(root, documents),
        None => ArrayData::NotAvailable,
    };
    let hierarchy_root = annotations
        .hierarchy_root
        .as_ref()
        .map(|root| root.location.clone());
    Ok(VariableContext::composed(
        Value::Object(data),
        array_data,
        hierarchy_root,
    )?)
}

/// Collect the hierarchy root's array from every document, in document
/// order.
fn expansion_data(root: &HierarchyRoot, documents: &[Document]) -> ArrayData {
    let Some(keys) = root.location.keys() else {
        return ArrayData::NotAvailable;
    };
    let mut items = Vec::new();
    let mut found = false;
    for doc in documents {
        let data = doc.as_value();
        if let Some(array) = lookup(&data, &keys).and_then(Value::as_array) {
            found = true;
            items.extend(array.iter().cloned());
        }
    }
    if found {
        ArrayData::Available(items)
    } else {
        ArrayData::NotAvailable
    }
}

fn merged_to_value(data: MergedData) -> Value {
    match data {
        MergedData::Flat(items) => Value::Array(items),
        MergedData::Preserved(groups) => {
            Value::Array(groups.into_iter().map(Value::Array).collect())
        }
    }
}

/// Insert `value` at a dotted location, creating intermediate objects.
fn insert_at_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }
    let mut keys = path.split('.');
    let Some(first) = keys.next() else { return };
    let mut current = map;
    let mut key = first;
    for next in keys {
        let entry = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !matches!(entry, Value::Object(_)) {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(inner) = entry else { return };
        current = inner;
        key = next;
    }
    current.insert(key.to_string(), value);
}

fn resolve_sibling(schema_path: &Path, template: &str) -> PathBuf {
    match schema_path.parent() {
        Some(parent) => parent.join(template),
        None => PathBuf::from(template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryDocumentProvider, MemorySchemaProvider, MemoryTemplateProvider};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(source: &str, value: Value) -> Document {
        let Value::Object(map) = value else {
            panic!("test document must be an object");
        };
        Document::new(source, map)
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "x-template": "summary.json.tmpl",
            "x-template-format": "json",
            "properties": {
                "commands": {
                    "type": "array",
                    "x-frontmatter-part": true,
                    "x-derived-from": "commands[]",
                    "x-merge-arrays": true
                },
                "tools": {
                    "type": "array",
                    "x-derived-from": "commands[].c1",
                    "x-derived-unique": true
                }
            }
        })
    }

    fn documents() -> Vec<Document> {
        vec![
            doc(
                "a.md",
                json!({"commands": [{"c1": "git"}, {"c1": "build"}]}),
            ),
            doc("b.md", json!({"commands": [{"c1": "git"}]})),
        ]
    }

    fn providers() -> (MemorySchemaProvider, MemoryDocumentProvider, MemoryTemplateProvider) {
        let mut schemas = MemorySchemaProvider::new();
        schemas.add("schemas/notes.yaml", schema());
        let docs = MemoryDocumentProvider::new(documents());
        let mut templates = MemoryTemplateProvider::new();
        templates.add(
            "schemas/summary.json.tmpl",
            json!({
                "tools": "{tools}",
                "all": ["{@items}"],
                "count": "{tools} found"
            }),
            Some(TemplateFormat::Json),
        );
        (schemas, docs, templates)
    }

    #[test]
    fn full_run_aggregates_and_renders() {
        let (schemas, docs, templates) = providers();
        let mut pipeline = Pipeline::new();
        let report = pipeline
            .run(
                Path::new("schemas/notes.yaml"),
                &schemas,
                &docs,
                &templates,
                None,
                None,
            )
            .unwrap();

        assert_eq!(report.document_count, 2);
        assert!(report.eval_errors.is_empty());
        assert_eq!(
            report.output.content,
            json!({
                "tools": ["git", "build"],
                "all": [{"c1": "git"}, {"c1": "build"}, {"c1": "git"}],
                "count": "[\"git\",\"build\"] found"
            })
        );
        assert_eq!(report.output.format, TemplateFormat::Json);
    }

    #[test]
    fn missing_template_binding_is_an_error() {
        let mut schemas = MemorySchemaProvider::new();
        schemas.add("s.yaml", json!({"type": "object"}));
        let docs = MemoryDocumentProvider::new(documents());
        let templates = MemoryTemplateProvider::new();

        let mut pipeline = Pipeline::new();
        let err = pipeline
            .run(Path::new("s.yaml"), &schemas, &docs, &templates, None, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::NoTemplate));
    }

    #[test]
    fn template_override_wins_over_binding() {
        let (schemas, docs, mut templates) = providers();
        templates.add(
            "other.json",
            json!({"only": "{tools}"}),
            Some(TemplateFormat::Json),
        );
        let mut pipeline = Pipeline::new();
        let report = pipeline
            .run(
                Path::new("schemas/notes.yaml"),
                &schemas,
                &docs,
                &templates,
                Some(Path::new("other.json")),
                None,
            )
            .unwrap();
        assert_eq!(report.output.content, json!({"only": ["git", "build"]}));
    }

    #[test]
    fn single_document_without_aggregation_uses_single_scope() {
        let mut schemas = MemorySchemaProvider::new();
        schemas.add(
            "s.yaml",
            json!({"type": "object", "x-template": "t.md"}),
        );
        let docs = MemoryDocumentProvider::new(vec![doc(
            "a.md",
            json!({"title": "hello", "id": {"full": "X1"}}),
        )]);
        let mut templates = MemoryTemplateProvider::new();
        templates.add(
            "t.md",
            json!("# {title} ({{id.full}})"),
            Some(TemplateFormat::Markdown),
        );

        let mut pipeline = Pipeline::new();
        let report = pipeline
            .run(Path::new("s.yaml"), &schemas, &docs, &templates, None, None)
            .unwrap();
        assert_eq!(report.output.content, json!("# hello (X1)"));
        assert_eq!(report.output.format, TemplateFormat::Markdown);
    }

    #[test]
    fn eval_errors_accumulate_without_aborting() {
        let (schemas, _, templates) = providers();
        let docs = MemoryDocumentProvider::new(vec![
            doc("bad.md", json!({"commands": "oops"})),
            doc("good.md", json!({"commands": [{"c1": "git"}]})),
        ]);
        let mut pipeline = Pipeline::new();
        let report = pipeline
            .run(
                Path::new("schemas/notes.yaml"),
                &schemas,
                &docs,
                &templates,
                None,
                None,
            )
            .unwrap();
        // Two derivations each hit the bad document once.
        assert_eq!(report.eval_errors.len(), 2);
        assert_eq!(report.output.content["tools"], json!(["git"]));
    }

    #[test]
    fn insert_at_path_creates_nested_objects() {
        let mut map = Map::new();
        insert_at_path(&mut map, "meta.owners", json!(["a"]));
        insert_at_path(&mut map, "meta.count", json!(1));
        insert_at_path(&mut map, "top", json!(true));
        assert_eq!(
            Value::Object(map),
            json!({"meta": {"owners": ["a"], "count": 1}, "top": true})
        );
    }

    struct CountingSchemaProvider {
        inner: MemorySchemaProvider,
        loads: std::cell::Cell<usize>,
    }

    impl SchemaProvider for CountingSchemaProvider {
        fn load_schema(&self, path: &Path) -> crate::error::CoreResult<Value> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load_schema(path)
        }
    }

    #[test]
    fn schema_is_loaded_and_resolved_once_per_path() {
        let (schemas, docs, templates) = providers();
        let counting = CountingSchemaProvider {
            inner: schemas,
            loads: std::cell::Cell::new(0),
        };
        let mut pipeline = Pipeline::new();
        for _ in 0..3 {
            pipeline
                .run(
                    Path::new("schemas/notes.yaml"),
                    &counting,
                    &docs,
                    &templates,
                    None,
                    None,
                )
                .unwrap();
        }
        assert_eq!(counting.loads.get(), 1);
    }
}
