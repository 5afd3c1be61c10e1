//! Run orchestration
//!
//! The coordinator owns a whole sync run: load the tracking manifest, fetch
//! the catalog listing, filter it by theme, drive the filtered datasets
//! through a bounded pool of concurrent fetch tasks, then persist the
//! manifest and report a summary.
//!
//! A Ctrl-C during the run flips a shutdown flag: datasets that have not
//! started yet are abandoned, in-flight downloads run to completion (or hit
//! their timeout), and whatever was recorded up to that point is still
//! persisted.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::fs;
use tracing::{info, warn};

use crate::app::client::{parse_catalog_url, CatalogClient};
use crate::app::fetcher::{process_dataset, DatasetOutcome};
use crate::app::models::filter_by_theme;
use crate::app::tracker::SyncTracker;
use crate::constants::{catalog, files, http, workers};
use crate::errors::Result;

/// Configuration for one sync run
///
/// Everything the run touches on disk or over the network is named here
/// explicitly; nothing depends on the process working directory beyond the
/// relative defaults.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Catalog listing endpoint
    pub catalog_url: String,
    /// Category tag selecting which datasets to sync
    pub theme: String,
    /// Directory receiving one normalized CSV per dataset
    pub output_dir: PathBuf,
    /// Tracking manifest path
    pub manifest_path: PathBuf,
    /// Number of concurrent fetch workers
    pub worker_count: usize,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            catalog_url: catalog::DEFAULT_URL.to_string(),
            theme: catalog::DEFAULT_THEME.to_string(),
            output_dir: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
            manifest_path: PathBuf::from(files::DEFAULT_MANIFEST_FILE),
            worker_count: workers::DEFAULT_WORKER_COUNT,
            request_timeout: http::REQUEST_TIMEOUT,
        }
    }
}

/// Final accounting for a sync run
///
/// Per-dataset failures are counted, not fatal; the run exits zero as long
/// as the catalog fetch and the final manifest write succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Datasets matching the theme filter
    pub total: usize,
    /// Freshly downloaded and recorded
    pub downloaded: usize,
    /// Skipped: tracker says unchanged
    pub up_to_date: usize,
    /// Skipped: no CSV distribution
    pub no_csv: usize,
    /// Failed after the skip checks; logged and left un-updated
    pub failed: usize,
    /// Never started because shutdown was requested
    pub aborted: usize,
}

impl SyncSummary {
    fn count(&mut self, outcome: DatasetOutcome) {
        match outcome {
            DatasetOutcome::Downloaded => self.downloaded += 1,
            DatasetOutcome::UpToDate => self.up_to_date += 1,
            DatasetOutcome::NoCsv => self.no_csv += 1,
            DatasetOutcome::Failed => self.failed += 1,
        }
    }
}

/// Orchestrates a full catalog sync
pub struct SyncCoordinator {
    config: SyncConfig,
    client: CatalogClient,
}

impl SyncCoordinator {
    /// Create a coordinator, building the shared HTTP client from the
    /// configured timeout.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let client = CatalogClient::with_timeout(config.request_timeout)?;
        Ok(Self { config, client })
    }

    /// Configuration this coordinator runs with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run a full sync.
    pub async fn run(&self) -> Result<SyncSummary> {
        self.run_with_progress(|_| {}).await
    }

    /// Run a full sync, invoking `on_outcome` as each dataset finishes.
    ///
    /// The callback drives the CLI progress bar; it runs on worker tasks and
    /// must not block.
    pub async fn run_with_progress<F>(&self, on_outcome: F) -> Result<SyncSummary>
    where
        F: Fn(DatasetOutcome) + Send + Sync,
    {
        let catalog_url = parse_catalog_url(&self.config.catalog_url)?;

        let tracker = SyncTracker::load(&self.config.manifest_path).await?;

        // Fatal on any error: without a listing there is nothing to sync and
        // the prior manifest stays untouched.
        let datasets = self.client.fetch_catalog(&catalog_url).await?;
        let filtered = filter_by_theme(datasets, &self.config.theme);
        info!(
            "{} of the catalog's datasets carry theme '{}'",
            filtered.len(),
            self.config.theme
        );

        fs::create_dir_all(&self.config.output_dir).await?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let signal_task = tokio::spawn({
            let shutdown = Arc::clone(&shutdown);
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Shutdown requested; finishing in-flight downloads");
                    shutdown.store(true, Ordering::SeqCst);
                }
            }
        });

        let mut summary = SyncSummary {
            total: filtered.len(),
            ..Default::default()
        };

        let outcomes: Vec<Option<DatasetOutcome>> = futures::stream::iter(filtered.iter())
            .map(|dataset| {
                let shutdown = Arc::clone(&shutdown);
                let tracker = &tracker;
                let on_outcome = &on_outcome;
                async move {
                    if shutdown.load(Ordering::SeqCst) {
                        return None;
                    }
                    let outcome =
                        process_dataset(&self.client, tracker, &self.config.output_dir, dataset)
                            .await;
                    on_outcome(outcome);
                    Some(outcome)
                }
            })
            .buffer_unordered(self.config.worker_count.max(1))
            .collect()
            .await;

        signal_task.abort();

        for outcome in outcomes {
            match outcome {
                Some(outcome) => summary.count(outcome),
                None => summary.aborted += 1,
            }
        }

        // The manifest is the only record of sync state; failing to write it
        // is fatal even though every dataset may have succeeded.
        tracker.persist().await?;

        info!(
            "Sync complete: {} downloaded, {} up to date, {} without CSV, {} failed",
            summary.downloaded, summary.up_to_date, summary.no_csv, summary.failed
        );

        Ok(summary)
    }
}
