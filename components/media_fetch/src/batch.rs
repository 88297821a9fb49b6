// components/media_fetch/src/batch.rs
use crate::fetcher::{DownloadOutcome, FetchRequest, MediaFetcher};
use crate::progress::ProgressHook;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Runs many downloads with at most `jobs` in flight
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    jobs: usize,
}

impl BatchRunner {
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Download every request and wait for all of them.
    ///
    /// Outcomes come back in the order the requests were given.
    pub async fn run(
        &self,
        fetcher: &MediaFetcher,
        requests: Vec<FetchRequest>,
        progress: &ProgressHook,
    ) -> BatchReport {
        tracing::debug!(count = requests.len(), jobs = self.jobs, "starting batch");

        // A slow download must not hold back the free workers
        let mut finished = stream::iter(requests.into_iter().enumerate())
            .map(|(index, request)| async move { (index, fetcher.fetch(&request, progress).await) })
            .buffer_unordered(self.jobs)
            .collect::<Vec<_>>()
            .await;
        finished.sort_by_key(|(index, _)| *index);

        let report = BatchReport {
            outcomes: finished.into_iter().map(|(_, outcome)| outcome).collect(),
        };
        tracing::debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<DownloadOutcome>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<PathBuf>,
    pub failures: Vec<FailedDownload>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FailedDownload {
    pub url: String,
    pub error: String,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    /// Sum of the per-download result codes
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| usize::from(outcome.result_code()))
            .sum()
    }

    /// Paths of the successful downloads, in request order
    pub fn output_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(DownloadOutcome::path)
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &crate::FetchError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.output {
            Ok(_) => None,
            Err(error) => Some((outcome.url.as_str(), error)),
        })
    }

    /// Process exit code: the number of failed downloads, saturating at 255
    pub fn exit_code(&self) -> i32 {
        self.failed().min(u8::MAX as usize) as i32
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            succeeded: self.succeeded(),
            failed: self.failed(),
            files: self.output_files().into_iter().map(Path::to_path_buf).collect(),
            failures: self
                .failures()
                .map(|(url, error)| FailedDownload {
                    url: url.to_string(),
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}
