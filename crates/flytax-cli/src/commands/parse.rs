//! Parse command - run the external parser on a document, then resolve fields.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use flytax_core::ParserOutput;

use crate::output::RenderArgs;
use crate::parser::run_parser;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Payslip document handed to the parser
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the parser timeout, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(flatten)]
    render: RenderArgs,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::config::load(config_path)?;

    if let Some(timeout) = args.timeout {
        config.parser.timeout_secs = timeout;
        config.validate()?;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing document: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Running {}...", config.parser.program));
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let parsed = run_parser(&config.parser, &args.input).await;
    pb.finish_and_clear();
    let parsed = parsed?;

    let output = ParserOutput::parse(&parsed);
    let resolution = super::resolve(&output.document, &args.render);

    debug!("Total processing time: {:?}", start.elapsed());

    super::emit(
        &resolution,
        &output.received,
        &args.render,
        &config.output,
        args.output.as_deref(),
    )
}
