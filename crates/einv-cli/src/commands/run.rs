//! Run command - extract every archive and split the extracted PDFs.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use einv_core::{ArchivePipeline, RunProgress, RunSummary};

use super::load_config;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Folder containing the e-invoice archives
    archives_dir: Option<PathBuf>,

    /// Folder receiving the extracted PDFs
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Folder receiving one PDF per invoice
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = args.archives_dir {
        config.folders.archives = dir;
    }
    if let Some(dir) = args.staging_dir {
        config.folders.staging = dir;
    }
    if let Some(dir) = args.output_dir {
        config.folders.output = dir;
    }

    println!(
        "{} Selected folder: {}",
        style("ℹ").blue(),
        config.folders.archives.display()
    );

    let pipeline = ArchivePipeline::new(config)?;

    let pb = ProgressBar::hidden();
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let summary = pipeline.run_with_progress(|event| match event {
        RunProgress::Extracted { summary, sources } => {
            println!(
                "{} Extracted {} of {} archives, {} PDFs to split",
                style("ℹ").blue(),
                summary.archives_extracted(),
                summary.archives.len(),
                sources
            );
            pb.set_length(sources as u64);
            pb.set_draw_target(ProgressDrawTarget::stderr());
        }
        RunProgress::Split { .. } => pb.inc(1),
    })?;
    pb.finish_and_clear();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &summary)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_summary(&summary, pipeline.config().folders.output.display());
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_summary(summary: &RunSummary, output: impl std::fmt::Display) {
    let failures = summary.failures();

    println!();
    println!(
        "{} Wrote {} invoices to {}",
        style("✓").green(),
        summary.documents_written(),
        output
    );
    println!(
        "   {} documents split, {} failed",
        style(summary.splits.iter().filter(|s| s.is_complete()).count()).green(),
        style(summary.splits.iter().filter(|s| !s.is_complete()).count() + summary.unreadable.len()).red()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", style("Skipped or failed:").red());
        for line in &failures {
            println!("  - {}", line);
        }
    }

    println!("Done");
}

fn write_summary(path: &PathBuf, summary: &RunSummary) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "source",
        "status",
        "renamed_to",
        "pages",
        "documents",
        "document_numbers",
        "errors",
    ])?;

    for archive in &summary.archives {
        if let Err(e) = &archive.result {
            wtr.write_record([
                archive.archive.display().to_string(),
                "archive_error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                e.to_string(),
            ])?;
        }
    }

    for failure in &summary.unreadable {
        wtr.write_record([
            failure.source.display().to_string(),
            "unreadable".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            failure.error.to_string(),
        ])?;
    }

    for split in &summary.splits {
        let status = if split.is_complete() { "split" } else { "aborted" };
        let names: Vec<&str> = split.outputs.iter().map(|o| o.name.as_str()).collect();
        wtr.write_record([
            split.source.display().to_string(),
            status.to_string(),
            split
                .renamed_to
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            split.page_count.to_string(),
            split.outputs.len().to_string(),
            names.join(";"),
            split.failures().join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
