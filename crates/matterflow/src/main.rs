/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command-line entry point for the Matterflow pipeline.
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matterflow_core::{
    FileSystemDocumentProvider, FileSystemSchemaProvider, FileSystemTemplateProvider, Pipeline,
    write_output,
};
use matterflow_template::{TemplateFormat, Verbosity};

#[derive(Parser, Debug)]
#[command(name = "matterflow")]
#[command(about = "Aggregate document frontmatter and render it through a template")]
struct Args {
    /// Schema file (YAML or JSON) driving aggregation and templating
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Directory containing the Markdown source documents
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Template file, overriding the schema's x-template binding
    #[arg(short = 't', long = "template")]
    template: Option<PathBuf>,

    /// Output format (json, yaml, xml, markdown), overriding the schema
    #[arg(short = 'f', long = "format")]
    format: Option<TemplateFormat>,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Fail when any document could not be aggregated
    #[arg(long = "strict")]
    strict: bool,

    /// Keep unresolvable placeholders in the output instead of blanking them
    #[arg(long = "keep-placeholders")]
    keep_placeholders: bool,

    /// Verbose output (-v for progress, -vv for engine debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "matterflow=warn",
        1 => "matterflow=info,matterflow_core=info",
        _ => "matterflow=debug,matterflow_core=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !args.schema.is_file() {
        anyhow::bail!("Schema file does not exist: {:?}", args.schema);
    }
    if !args.input_dir.is_dir() {
        anyhow::bail!("Input path is not a directory: {:?}", args.input_dir);
    }

    let verbosity = if args.keep_placeholders {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let documents = FileSystemDocumentProvider::new(&args.input_dir);
    let mut pipeline = Pipeline::new().with_verbosity(verbosity);
    let report = pipeline
        .run(
            &args.schema,
            &FileSystemSchemaProvider,
            &documents,
            &FileSystemTemplateProvider,
            args.template.as_deref(),
            args.format,
        )
        .with_context(|| format!("Failed to process {:?}", args.schema))?;

    for error in &report.eval_errors {
        tracing::warn!("{}", error);
    }
    if args.strict && !report.eval_errors.is_empty() {
        anyhow::bail!(
            "{} of {} documents failed aggregation",
            report
                .eval_errors
                .iter()
                .map(|e| e.source_path.as_path())
                .collect::<std::collections::HashSet<_>>()
                .len(),
            report.document_count
        );
    }

    let rendered = write_output(&report.output)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {:?}", path))?;
            tracing::info!(output = %path.display(), "Wrote rendered output");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
