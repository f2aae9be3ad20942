//! Split command - split a single consolidated PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use einv_core::{ArchivePipeline, SplitReport};

use super::load_config;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Consolidated PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Folder receiving one PDF per invoice
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Leave the input file name unchanged
    #[arg(long)]
    no_rename: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SplitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let output_dir = args.output_dir.unwrap_or_else(|| config.folders.output.clone());
    fs::create_dir_all(&output_dir)?;

    info!("Processing file: {}", args.input.display());
    let pipeline = ArchivePipeline::new(config)?;
    let report = pipeline.split_file(&args.input, &output_dir, !args.no_rename)?;

    if args.json {
        println!("{}", format_json(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_complete() {
        anyhow::bail!("Split stopped early: {}", report.failures().join("; "));
    }

    Ok(())
}

fn format_json(report: &SplitReport) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "source": report.source,
        "rename_target": report.rename_target,
        "fallback_rename": report.fallback_rename,
        "renamed_to": report.renamed_to,
        "page_count": report.page_count,
        "markers": report.markers,
        "outputs": report.outputs,
        "errors": report.failures(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn print_report(report: &SplitReport) {
    for output in &report.outputs {
        println!(
            "{} {} ({} pages)",
            style("✓").green(),
            output.path.display(),
            output.pages.len()
        );
    }

    if let Some(renamed) = &report.renamed_to {
        println!(
            "{} Renamed source to {}",
            style("ℹ").blue(),
            renamed.display()
        );
    } else if report.fallback_rename {
        println!(
            "{} No marker on first page, source name kept",
            style("ℹ").blue()
        );
    }

    for line in report.failures() {
        eprintln!("{} {}", style("✗").red(), line);
    }
}
