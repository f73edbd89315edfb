//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod parse;

use std::fs;
use std::path::Path;

use console::style;
use tracing::warn;

use flytax_core::{FieldResolver, ParsedDocument, Resolution};
use serde_json::Value;

use crate::output::{self, RenderArgs};

/// Resolve a document with the tiers selected on the command line.
pub(crate) fn resolve(document: &ParsedDocument, args: &RenderArgs) -> Resolution {
    let resolution = FieldResolver::new()
        .with_text_fallback(!args.no_text_fallback)
        .resolve_detailed(document.clone());

    for warning in &resolution.warnings {
        warn!("{}", warning);
    }

    resolution
}

/// Render `resolution` and write it to `output_path`, or stdout.
pub(crate) fn emit(
    resolution: &Resolution,
    parsed_raw: &Value,
    args: &RenderArgs,
    defaults: &flytax_core::models::config::OutputConfig,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    if args.explain {
        output::explain(resolution);
    }

    let rendered = output::render(
        resolution,
        parsed_raw,
        args.format,
        args.pretty || defaults.pretty,
        args.include_parsed || defaults.include_parsed,
    )?;

    match output_path {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered.trim_end()))?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}
