//! Serializing rendered output.
//!
//! The substitution engine produces a value tree; this module turns it into
//! text in the declared format. Markdown templates are string content and
//! pass through; JSON and YAML serialize the tree; XML wraps it in an
//! `<output>` document with `<item>` elements for array entries.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use matterflow_template::{RenderedOutput, TemplateFormat};

use crate::error::{CoreError, CoreResult};

/// Serialize a rendered output in its declared format.
pub fn write_output(output: &RenderedOutput) -> CoreResult<String> {
    match output.format {
        TemplateFormat::Json => {
            let mut text = serde_json::to_string_pretty(&output.content)?;
            text.push('\n');
            Ok(text)
        }
        TemplateFormat::Yaml => Ok(serde_yaml::to_string(&output.content)?),
        TemplateFormat::Xml => write_xml(&output.content),
        TemplateFormat::Markdown => Ok(markdown_text(&output.content)),
    }
}

/// Markdown templates are strings; if substitution produced something
/// structured anyway, fall back to JSON so the output is still readable.
fn markdown_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

fn write_xml(content: &Value) -> CoreResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, "output", content)?;
    String::from_utf8(writer.into_inner()).map_err(|err| {
        CoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> CoreResult<()> {
    match value {
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Array(items) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_element(writer, "item", item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        scalar => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&scalar_text(scalar))))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
