//! Extract command - resolve fields from saved parser output.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{debug, info};

use flytax_core::ParserOutput;

use crate::output::RenderArgs;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Parser output file (JSON or text), or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    let content = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read parser output from stdin")?;
        buffer
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        info!("Reading parser output: {}", args.input.display());
        fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?
    };

    let output = ParserOutput::parse(&content);
    debug!(
        "Parser output is {}",
        if output.document.is_structured() { "structured" } else { "text" }
    );

    let resolution = super::resolve(&output.document, &args.render);
    super::emit(
        &resolution,
        &output.received,
        &args.render,
        &config.output,
        args.output.as_deref(),
    )
}
