//! Batch command - resolve fields for many parser outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use flytax_core::{ExtractionResult, ParserOutput};

use crate::output::{self, RenderArgs, CSV_HEADER};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching parser output files (.json, .txt)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write a summary CSV (into the output directory, or the given path)
    #[arg(long)]
    summary: Option<Option<PathBuf>>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    render: RenderArgs,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_file(&path, &args, &config.output) {
            Ok(result) => results.push(FileResult {
                path,
                result: Some(result),
                error: None,
            }),
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e);
                }
                results.push(FileResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(summary) = &args.summary {
        let summary_path = match (summary, &args.output_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(dir)) => dir.join("summary.csv"),
            (None, None) => PathBuf::from("summary.csv"),
        };
        write_summary(&summary_path, &results)?;
        eprintln!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} Processed {} files ({} failed) in {:.1}s",
        if failed == 0 { style("✓").green() } else { style("!").yellow() },
        results.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn process_file(
    path: &Path,
    args: &BatchArgs,
    defaults: &flytax_core::models::config::OutputConfig,
) -> anyhow::Result<ExtractionResult> {
    let content = fs::read_to_string(path)?;
    let parsed = ParserOutput::parse(&content);
    let resolution = super::resolve(&parsed.document, &args.render);

    debug!("{}: resolved {:?}", path.display(), resolution.sources);

    let rendered = output::render(
        &resolution,
        &parsed.received,
        args.render.format,
        args.render.pretty || defaults.pretty,
        args.render.include_parsed || defaults.include_parsed,
    )?;

    match args.output_dir {
        Some(ref output_dir) => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            let output_path =
                output_dir.join(format!("{}.{}", stem, args.render.format.extension()));
            fs::write(&output_path, format!("{}\n", rendered.trim_end()))?;
        }
        // Each file's rendering in turn; CSV repeats its header per file
        None => println!("{}", rendered.trim_end()),
    }

    Ok(resolution.result)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["file"];
    header.extend(CSV_HEADER);
    header.push("error");
    wtr.write_record(&header)?;

    for entry in results {
        let mut record = vec![entry.path.display().to_string()];
        match &entry.result {
            Some(result) => record.extend(output::csv_cells(result)),
            None => record.extend(std::iter::repeat_n(String::new(), CSV_HEADER.len())),
        }
        record.push(entry.error.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
