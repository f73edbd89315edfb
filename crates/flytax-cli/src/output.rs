//! Rendering of extraction results.

use clap::Args;
use console::style;

use flytax_core::payslip::rules::format_amount;
use flytax_core::{ExtractionResponse, ExtractionResult, PayslipField, Resolution};
use serde_json::Value;

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// CSV with a header row
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Options shared by every command that prints a record.
#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,

    /// Emit {"parsed_raw": ..., "summary": ...} instead of the bare record (JSON only)
    #[arg(long)]
    pub include_parsed: bool,

    /// Print which source resolved each field (to stderr)
    #[arg(long)]
    pub explain: bool,

    /// Do not scan raw text for labels
    #[arg(long)]
    pub no_text_fallback: bool,
}

pub const CSV_HEADER: [&str; 4] = [
    "montant_imposable",
    "cumul_imposable",
    "frais_emploi",
    "decouchers_fpro",
];

/// Render a resolution according to the chosen format.
pub fn render(
    resolution: &Resolution,
    parsed_raw: &Value,
    format: OutputFormat,
    pretty: bool,
    include_parsed: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let value = if include_parsed {
                serde_json::to_value(ExtractionResponse {
                    parsed_raw: parsed_raw.clone(),
                    summary: resolution.result.clone(),
                })?
            } else {
                serde_json::to_value(&resolution.result)?
            };
            if pretty {
                Ok(serde_json::to_string_pretty(&value)?)
            } else {
                Ok(serde_json::to_string(&value)?)
            }
        }
        OutputFormat::Csv => format_csv(&resolution.result),
        OutputFormat::Text => Ok(format_text(&resolution.result)),
    }
}

/// CSV cells for the four amounts, empty when unresolved.
pub fn csv_cells(result: &ExtractionResult) -> Vec<String> {
    PayslipField::ALL
        .into_iter()
        .map(|field| result.get(field).map(|v| v.normalize().to_string()).unwrap_or_default())
        .collect()
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_cells(result))?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn label(field: PayslipField) -> &'static str {
    match field {
        PayslipField::MontantImposable => "Montant imposable",
        PayslipField::CumulImposable => "Cumul imposable",
        PayslipField::FraisEmploi => "Frais d'emploi",
        PayslipField::DecouchersFpro => "Découchers F.PRO",
    }
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();
    for field in PayslipField::ALL {
        let value = result.get(field).map(format_amount).unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("{:<18} {:>14}\n", format!("{}:", label(field)), value));
    }
    output.push_str(&format!("\nRaw text: {} characters\n", result.raw_text.chars().count()));
    output
}

/// Print per-field provenance and warnings to stderr.
pub fn explain(resolution: &Resolution) {
    for (field, source) in &resolution.sources {
        let source = serde_json::to_value(source)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        eprintln!("{} {:<18} {}", style("ℹ").blue(), field.key(), source);
    }
    for warning in &resolution.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
}
