//! Archive-to-invoices orchestration.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::archive;
use crate::error::{EinvError, Result};
use crate::folders::{rename_in_place, reset_folder};
use crate::invoice::{InvoicePatterns, InvoiceSplitter};
use crate::models::config::EinvConfig;
use crate::models::report::{ArchiveReport, RunSummary, SourceFailure, SplitReport};
use crate::pdf::PdfDocument;

/// Runs extraction and splitting over the configured folders.
pub struct ArchivePipeline {
    config: EinvConfig,
    splitter: InvoiceSplitter,
}

impl ArchivePipeline {
    /// Build a pipeline, compiling the configured patterns.
    pub fn new(config: EinvConfig) -> Result<Self> {
        let patterns = InvoicePatterns::from_config(&config.extraction)?;
        Ok(Self {
            config,
            splitter: InvoiceSplitter::new(patterns),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &EinvConfig {
        &self.config
    }

    /// Empty the staging and output folders.
    pub fn prepare_folders(&self) -> Result<()> {
        reset_folder(&self.config.folders.staging)?;
        reset_folder(&self.config.folders.output)?;
        Ok(())
    }

    /// Extract every archive into the staging folder.
    pub fn extract_archives(&self) -> Result<Vec<ArchiveReport>> {
        Ok(archive::extract_archives(
            self.archives_dir()?,
            &self.config.archive.extension,
            &self.config.archive.member_name,
            &self.config.folders.staging,
        )?)
    }

    fn archives_dir(&self) -> Result<&Path> {
        let archives = &self.config.folders.archives;
        if !archives.is_dir() {
            return Err(EinvError::Config(format!(
                "Archives folder not found: {}",
                archives.display()
            )));
        }
        Ok(archives)
    }

    /// Consolidated PDFs waiting in the staging folder.
    pub fn staged_sources(&self) -> Result<Vec<PathBuf>> {
        Ok(archive::list_files(&self.config.folders.staging, "pdf")?)
    }

    /// Split one consolidated PDF into `output_dir`.
    ///
    /// Fails only when the PDF cannot be opened. Everything after that is
    /// recorded in the report. The source is renamed only when every page
    /// was visited and `rename` is set.
    pub fn split_file(&self, source: &Path, output_dir: &Path, rename: bool) -> Result<SplitReport> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| EinvError::Config(format!("invalid file name: {}", source.display())))?;

        let doc = PdfDocument::open(source, &self.config.pdf)?;
        let mut report = self.splitter.split(&doc, source, stem, output_dir);

        if rename && report.is_complete() {
            let new_name = format!("{}.pdf", report.rename_target);
            match rename_in_place(source, &new_name) {
                Ok(target) => {
                    info!("Renamed {} -> {}", source.display(), target.display());
                    report.renamed_to = Some(target);
                }
                Err(e) => {
                    warn!("Error renaming file {}: {}", source.display(), e);
                    report.errors.push(e.into());
                }
            }
        }

        Ok(report)
    }

    /// Split every staged PDF into the output folder.
    fn split_staged<F>(&self, summary: &mut RunSummary, mut on_progress: F) -> Result<()>
    where
        F: FnMut(RunProgress<'_>),
    {
        // Collected up front: renames land in the same folder
        let sources = self.staged_sources()?;
        on_progress(RunProgress::Extracted {
            summary: &*summary,
            sources: sources.len(),
        });
        for source in &sources {
            self.split_into_summary(source, summary);
            on_progress(RunProgress::Split {
                source: source.as_path(),
            });
        }
        Ok(())
    }

    /// Split one staged PDF, recording the outcome in `summary`.
    pub fn split_into_summary(&self, source: &Path, summary: &mut RunSummary) {
        match self.split_file(source, &self.config.folders.output, true) {
            Ok(report) => summary.splits.push(report),
            Err(e) => {
                error!("Error opening PDF file {}: {}", source.display(), e);
                summary.unreadable.push(SourceFailure {
                    source: source.to_path_buf(),
                    error: e,
                });
            }
        }
    }

    /// Reset folders, extract all archives and split every extracted PDF.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), reporting progress to `on_progress`.
    pub fn run_with_progress<F>(&self, on_progress: F) -> Result<RunSummary>
    where
        F: FnMut(RunProgress<'_>),
    {
        self.archives_dir()?;
        self.prepare_folders()?;

        let mut summary = RunSummary {
            archives: self.extract_archives()?,
            ..RunSummary::default()
        };
        self.split_staged(&mut summary, on_progress)?;

        info!(
            "Done: {} of {} archives extracted, {} documents written",
            summary.archives_extracted(),
            summary.archives.len(),
            summary.documents_written()
        );
        Ok(summary)
    }
}

/// Progress of a pipeline run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// Archives are extracted and `sources` staged PDFs are about to be split.
    Extracted { summary: &'a RunSummary, sources: usize },
    /// One staged PDF has been processed.
    Split { source: &'a Path },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_pattern() {
        let mut config = EinvConfig::default();
        config.extraction.document_date_pattern = "[".to_string();
        assert!(matches!(ArchivePipeline::new(config), Err(EinvError::Config(_))));
    }

    #[test]
    fn test_missing_archives_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EinvConfig::default();
        config.folders.archives = dir.path().join("missing");
        config.folders.staging = dir.path().join("staging");
        config.folders.output = dir.path().join("output");

        let pipeline = ArchivePipeline::new(config).unwrap();
        assert!(matches!(pipeline.run(), Err(EinvError::Config(_))));
        // nothing is reset before the archives folder is known to exist
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_run_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EinvConfig::default();
        config.folders.archives = dir.path().join("archives");
        config.folders.staging = dir.path().join("staging");
        config.folders.output = dir.path().join("output");
        std::fs::create_dir(&config.folders.archives).unwrap();
        std::fs::write(config.folders.archives.join("broken.zip"), b"not a zip").unwrap();

        let pipeline = ArchivePipeline::new(config).unwrap();
        let mut events = Vec::new();
        let summary = pipeline
            .run_with_progress(|event| match event {
                RunProgress::Extracted { summary, sources } => events.push(format!(
                    "extracted {}/{} {}",
                    summary.archives_extracted(),
                    summary.archives.len(),
                    sources
                )),
                RunProgress::Split { source } => {
                    events.push(format!("split {}", source.display()))
                }
            })
            .unwrap();

        assert_eq!(events, vec!["extracted 0/1 0".to_string()]);
        assert_eq!(summary.failures().len(), 1);
    }

    #[test]
    fn test_unreadable_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.pdf");
        std::fs::write(&source, b"not a pdf").unwrap();

        let pipeline = ArchivePipeline::new(EinvConfig::default()).unwrap();
        let mut summary = RunSummary::default();
        pipeline.split_into_summary(&source, &mut summary);

        assert!(summary.splits.is_empty());
        assert_eq!(summary.unreadable.len(), 1);
        assert_eq!(summary.failures().len(), 1);
        assert!(source.exists());
    }
}
