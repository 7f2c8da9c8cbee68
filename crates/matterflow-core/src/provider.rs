//! Document, schema, and template providers.
//!
//! Each provider is a small trait with a filesystem implementation for
//! production and an in-memory implementation for tests, so the pipeline
//! never touches the filesystem directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use matterflow_aggregate::Document;
use matterflow_template::TemplateFormat;

use crate::error::{CoreError, CoreResult};
use crate::frontmatter::parse_document;

/// Yields the parsed frontmatter documents for one processing run.
pub trait DocumentProvider {
    fn load_documents(&self) -> CoreResult<Vec<Document>>;
}

/// Yields a parsed schema tree for a given path.
pub trait SchemaProvider {
    fn load_schema(&self, path: &Path) -> CoreResult<Value>;
}

/// Yields raw template content plus its declared format.
pub trait TemplateProvider {
    fn load_template(&self, path: &Path) -> CoreResult<(Value, Option<TemplateFormat>)>;
}

/// Extensions treated as Markdown sources.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "qmd"];

/// Loads documents by walking a directory for Markdown files.
///
/// Files are visited in path order so document order (and therefore
/// aggregation order) is deterministic. Files without a frontmatter block
/// are skipped.
#[derive(Debug, Clone)]
pub struct FileSystemDocumentProvider {
    root: PathBuf,
}

impl FileSystemDocumentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemDocumentProvider { root: root.into() }
    }
}

impl DocumentProvider for FileSystemDocumentProvider {
    fn load_documents(&self) -> CoreResult<Vec<Document>> {
        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_markdown = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext));
            if !entry.file_type().is_file() || !is_markdown {
                continue;
            }
            let text = std::fs::read_to_string(path)?;
            if let Some(doc) = parse_document(path, &text)? {
                documents.push(doc);
            }
        }
        Ok(documents)
    }
}

/// Provider over already-parsed documents, for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentProvider {
    documents: Vec<Document>,
}

impl MemoryDocumentProvider {
    pub fn new(documents: Vec<Document>) -> Self {
        MemoryDocumentProvider { documents }
    }
}

impl DocumentProvider for MemoryDocumentProvider {
    fn load_documents(&self) -> CoreResult<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Loads schemas from YAML or JSON files, decided by extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSchemaProvider;

impl SchemaProvider for FileSystemSchemaProvider {
    fn load_schema(&self, path: &Path) -> CoreResult<Value> {
        if !path.exists() {
            return Err(CoreError::SchemaNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        parse_by_extension(path, &text)
    }
}

/// Schema provider backed by an in-memory map, for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaProvider {
    schemas: HashMap<PathBuf, Value>,
}

impl MemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<PathBuf>, schema: Value) -> &mut Self {
        self.schemas.insert(path.into(), schema);
        self
    }
}

impl SchemaProvider for MemorySchemaProvider {
    fn load_schema(&self, path: &Path) -> CoreResult<Value> {
        self.schemas
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::SchemaNotFound {
                path: path.to_path_buf(),
            })
    }
}

/// Loads templates from the filesystem.
///
/// JSON and YAML templates are parsed into a value tree so object/array
/// substitution rules apply; anything else is raw string content. The
/// declared format comes from the file extension, looking through a
/// trailing `.tmpl` (`summary.json.tmpl` is a JSON template).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemTemplateProvider;

impl TemplateProvider for FileSystemTemplateProvider {
    fn load_template(&self, path: &Path) -> CoreResult<(Value, Option<TemplateFormat>)> {
        if !path.exists() {
            return Err(CoreError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let format = template_format(path);
        let content = match format {
            Some(TemplateFormat::Json) => {
                serde_json::from_str(&text).map_err(|source| CoreError::ParseFailed {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some(TemplateFormat::Yaml) => serde_yaml::from_str(&text)?,
            _ => Value::String(text),
        };
        Ok((content, format))
    }
}

/// Template provider backed by an in-memory map, for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateProvider {
    templates: HashMap<PathBuf, (Value, Option<TemplateFormat>)>,
}

impl MemoryTemplateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        path: impl Into<PathBuf>,
        content: Value,
        format: Option<TemplateFormat>,
    ) -> &mut Self {
        self.templates.insert(path.into(), (content, format));
        self
    }
}

impl TemplateProvider for MemoryTemplateProvider {
    fn load_template(&self, path: &Path) -> CoreResult<(Value, Option<TemplateFormat>)> {
        self.templates
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::TemplateNotFound {
                path: path.to_path_buf(),
            })
    }
}

fn parse_by_extension(path: &Path, text: &str) -> CoreResult<Value> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(text).map_err(|source| CoreError::ParseFailed {
            path: path.to_path_buf(),
            source,
        }),
        _ => Ok(serde_yaml::from_str(text)?),
    }
}

/// Infer a template's format from its path.
fn template_format(path: &Path) -> Option<TemplateFormat> {
    let ext = path.extension()?.to_str()?;
    if ext != "tmpl" {
        return TemplateFormat::from_extension(ext);
    }
    let stem = Path::new(path.file_stem()?);
    TemplateFormat::from_extension(stem.extension()?.to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn template_format_looks_through_tmpl_suffix() {
        assert_eq!(
            template_format(Path::new("summary.json.tmpl")),
            Some(TemplateFormat::Json)
        );
        assert_eq!(
            template_format(Path::new("report.yaml")),
            Some(TemplateFormat::Yaml)
        );
        assert_eq!(
            template_format(Path::new("page.md")),
            Some(TemplateFormat::Markdown)
        );
        assert_eq!(template_format(Path::new("noext")), None);
    }

    #[test]
    fn filesystem_documents_are_loaded_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, title) in [("b.md", "second"), ("a.md", "first")] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            write!(file, "---\ntitle: {}\n---\nbody\n", title).unwrap();
        }
        std::fs::write(dir.path().join("ignored.txt"), "---\ntitle: no\n---\n").unwrap();
        std::fs::write(dir.path().join("plain.md"), "no frontmatter\n").unwrap();

        let provider = FileSystemDocumentProvider::new(dir.path());
        let docs = provider.load_documents().unwrap();
        let titles: Vec<&Value> = docs.iter().filter_map(|d| d.get("title")).collect();
        assert_eq!(titles, vec![&json!("first"), &json!("second")]);
    }

    #[test]
    fn memory_schema_provider_reports_missing_paths() {
        let provider = MemorySchemaProvider::new();
        let err = provider.load_schema(Path::new("missing.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::SchemaNotFound { .. }));
    }

    #[test]
    fn filesystem_schema_provider_parses_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("schema.yaml");
        std::fs::write(&yaml_path, "type: object\n").unwrap();
        let json_path = dir.path().join("schema.json");
        std::fs::write(&json_path, r#"{"type": "object"}"#).unwrap();

        let provider = FileSystemSchemaProvider;
        assert_eq!(
            provider.load_schema(&yaml_path).unwrap(),
            json!({"type": "object"})
        );
        assert_eq!(
            provider.load_schema(&json_path).unwrap(),
            json!({"type": "object"})
        );
    }

    #[test]
    fn filesystem_template_provider_parses_structured_formats() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("t.json.tmpl");
        std::fs::write(&json_path, r#"{"v": "{title}"}"#).unwrap();
        let md_path = dir.path().join("t.md");
        std::fs::write(&md_path, "# {title}\n").unwrap();

        let provider = FileSystemTemplateProvider;
        let (content, format) = provider.load_template(&json_path).unwrap();
        assert_eq!(content, json!({"v": "{title}"}));
        assert_eq!(format, Some(TemplateFormat::Json));

        let (content, format) = provider.load_template(&md_path).unwrap();
        assert_eq!(content, json!("# {title}\n"));
        assert_eq!(format, Some(TemplateFormat::Markdown));
    }
}
