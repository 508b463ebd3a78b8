//! Bounded concurrent dispatch of file downloads.

use std::path::Path;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::api::RemoteFile;
use crate::download::fetch::{fetch_file, FetchOutcome};
use crate::output::create_item_bar;
use crate::retry::RetryPolicy;

/// Tally of one dispatched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub downloaded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub bytes: u64,
}

impl BatchReport {
    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            FetchOutcome::Failed { .. } | FetchOutcome::Rejected => self.failed += 1,
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.downloaded += other.downloaded;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.bytes += other.bytes;
    }

    /// Number of fetches actually attempted.
    pub fn attempted(&self) -> u64 {
        self.downloaded + self.failed
    }
}

/// Runs fetches with at most `max_workers` in flight.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    max_workers: usize,
    retry: RetryPolicy,
    show_progress: bool,
}

impl Dispatcher {
    /// A worker count of zero is treated as one.
    pub fn new(client: Client, max_workers: usize, retry: RetryPolicy) -> Self {
        Self {
            client,
            max_workers: max_workers.max(1),
            retry,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Download every file into `dest_dir` and wait for all of them.
    ///
    /// Files without a URL are skipped before submission. A failing file
    /// never stops the rest of the batch.
    pub async fn dispatch(&self, files: &[RemoteFile], dest_dir: &Path) -> BatchReport {
        let mut report = BatchReport::default();

        let tasks: Vec<(&str, &str)> = files
            .iter()
            .filter_map(|file| match file.download_url() {
                Some(url) => Some((url, file.display_name.as_str())),
                None => {
                    tracing::warn!(
                        "Skipping file with no URL: {} (id {})",
                        file.display_name,
                        file.id
                    );
                    report.skipped += 1;
                    None
                }
            })
            .collect();

        if tasks.is_empty() {
            return report;
        }

        let progress = (self.show_progress && tasks.len() > 1)
            .then(|| create_item_bar(tasks.len() as u64, &dest_dir.display().to_string()));

        let mut outcomes = stream::iter(tasks)
            .map(|(url, name)| fetch_file(&self.client, url, name, dest_dir, self.retry))
            .buffer_unordered(self.max_workers);

        while let Some(outcome) = outcomes.next().await {
            report.record(&outcome);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        report
    }
}
