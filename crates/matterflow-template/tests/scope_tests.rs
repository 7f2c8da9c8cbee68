/*
 * scope_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests exercising substitution across all three context
 * scopes.
 */

use pretty_assertions::assert_eq;
use serde_json::json;

use matterflow_path::PathExpression;
use matterflow_template::{
    ArrayData, TemplateFormat, VariableContext, Verbosity, render, substitute,
};

#[test]
fn single_scope_renders_document_fields() {
    let ctx = VariableContext::single(json!({
        "title": "Notes",
        "meta": {"author": "sam", "year": 2025}
    }))
    .unwrap();

    let template = json!({
        "heading": "# {title}",
        "byline": "{meta.author} ({meta.year})",
        "year": "{meta.year}"
    });
    let rendered = substitute(&template, &ctx, Verbosity::Normal).unwrap();
    assert_eq!(
        rendered,
        json!({
            "heading": "# Notes",
            "byline": "sam (2025)",
            "year": 2025
        })
    );
}

#[test]
fn composed_scope_mixes_base_data_and_expansion_items() {
    let ctx = VariableContext::composed(
        json!({"tools": ["git", "build"]}),
        ArrayData::Available(vec![json!({"c1": "git"}), json!({"c1": "build"})]),
        None,
    )
    .unwrap();

    let template = json!({
        "tools": "{tools}",
        "commands": ["{@items}"]
    });
    let rendered = substitute(&template, &ctx, Verbosity::Normal).unwrap();
    assert_eq!(
        rendered,
        json!({
            "tools": ["git", "build"],
            "commands": [{"c1": "git"}, {"c1": "build"}]
        })
    );
}

#[test]
fn composed_scope_reads_expansion_from_hierarchy_root() {
    let root = PathExpression::parse_simple("commands").unwrap();
    let ctx = VariableContext::composed(
        json!({"commands": [{"c1": "git"}]}),
        ArrayData::NotAvailable,
        Some(root),
    )
    .unwrap();

    let rendered = substitute(&json!(["{@items}"]), &ctx, Verbosity::Normal).unwrap();
    assert_eq!(rendered, json!([{"c1": "git"}]));
}

#[test]
fn array_expansion_scope_renders_per_item_fragments() {
    // Rendering a repeated fragment: a fresh Single context per item, the
    // ArrayExpansion context for the whole-list placeholder.
    let items = vec![json!({"name": "git"}), json!({"name": "build"})];

    let fragment = json!("- {name}");
    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            let ctx = VariableContext::single(item.clone()).unwrap();
            substitute(&fragment, &ctx, Verbosity::Normal)
                .unwrap()
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(lines, vec!["- git", "- build"]);

    let ctx = VariableContext::array_expansion(items);
    let rendered = substitute(&json!({"all": "{@items}"}), &ctx, Verbosity::Normal).unwrap();
    assert_eq!(
        rendered,
        json!({"all": [{"name": "git"}, {"name": "build"}]})
    );
}

#[test]
fn verbosity_modes_differ_only_for_missing_variables() {
    let ctx = VariableContext::single(json!({"present": "yes"})).unwrap();
    let template = json!("{present} {absent}");

    let normal = substitute(&template, &ctx, Verbosity::Normal).unwrap();
    assert_eq!(normal, json!("yes "));

    let verbose = substitute(&template, &ctx, Verbosity::Verbose).unwrap();
    assert_eq!(verbose, json!("yes {absent}"));
}

#[test]
fn render_tracks_referenced_variables_across_scopes() {
    let ctx = VariableContext::composed(
        json!({"title": "t"}),
        ArrayData::Available(vec![json!(1)]),
        None,
    )
    .unwrap();
    let template = json!({"a": "{title}", "b": ["{@items}"], "c": "{title}"});
    let output = render(&template, &ctx, Verbosity::Normal, TemplateFormat::Json).unwrap();
    assert_eq!(
        output.variables,
        vec!["title".to_string(), "@items".to_string()]
    );
}
