// bases/grab_cli/src/output.rs
use color_eyre::Result;
use media_fetch::{BatchReport, Mode, ProgressEvent, ProgressHook, ProgressStatus, ValidationError};
use std::path::Path;
use std::sync::Arc;

pub struct OutputHandler {
    verbose: bool,
    json: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn print_invalid_input(&self, error: &ValidationError) {
        eprintln!("{}", error);
    }

    pub fn print_batch_start(&self, count: usize, mode: Mode, jobs: usize, output_dir: &Path) {
        if self.verbose {
            eprintln!(
                "Downloading {} {} item(s) into {} ({} at a time)",
                count,
                mode,
                output_dir.display(),
                jobs
            );
        }
    }

    pub fn progress_hook(&self) -> ProgressHook {
        let verbose = self.verbose;
        Arc::new(move |event: &ProgressEvent| match &event.status {
            ProgressStatus::Downloading { percent } => {
                tracing::trace!(url = %event.url, percent, "progress");
            }
            ProgressStatus::Finished { path } => {
                if verbose {
                    eprintln!("Finished: {} -> {}", event.url, path.display());
                }
            }
        })
    }

    pub fn print_report(&self, report: &BatchReport) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report.summary())?);
            return Ok(());
        }

        for (url, error) in report.failures() {
            eprintln!("Failed: {}: {}", url, error);
        }

        println!("Successfully downloaded files:");
        for path in report.output_files() {
            println!("{}", path.display());
        }

        if self.verbose {
            eprintln!(
                "{} succeeded, {} failed",
                report.succeeded(),
                report.failed()
            );
        }
        Ok(())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
