//! The extraction runner: walks the task grid, classifies fetch outcomes,
//! and checkpoints after every task so any invocation can be cut short and
//! resumed without duplicate work or lost results.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::partners::CANONICAL_PARTNERS;
use crate::domain::{
    FetchOutcome, ProgressState, ResultArchive, RunCounters, RunReport, TaskGrid, TradeFlow,
};
use crate::error::HarvestError;
use crate::ports::blob_store::BlobStore;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::fetcher::TradeFetcher;

use super::budget::{DEFAULT_BUDGET, TimeBudgetGuard};
use super::keys::StorageKeys;
use super::pacing::RetryPacing;

/// What to extract: one reporting country, one direction, one year range
/// (inclusive on both ends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub reporter_code: u32,
    pub flow: TradeFlow,
    pub start_year: i32,
    pub end_year: i32,

    /// Resolved display name of the reporter; goes into the storage keys.
    pub country_name: String,
}

/// Drives one invocation of the engine.
///
/// Single logical thread of control: one fetch at a time, one backoff sleep
/// at a time. The remote quota is per-credential, so running tasks in
/// parallel would invalidate what the pacing counter means.
pub struct ExtractionRunner {
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn TradeFetcher>,
    clock: Arc<dyn Clock>,
    budget: Duration,
    partners: Vec<u32>,
}

impl ExtractionRunner {
    pub fn new(store: Arc<dyn BlobStore>, fetcher: Arc<dyn TradeFetcher>) -> Self {
        Self {
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            budget: DEFAULT_BUDGET,
            partners: CANONICAL_PARTNERS.to_vec(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_partners(mut self, partners: impl Into<Vec<u32>>) -> Self {
        self.partners = partners.into();
        self
    }

    /// Run until the grid is exhausted, the time budget expires, or the
    /// remote quota is gone. Terminal conditions come back as a report;
    /// an `Err` means a checkpoint could not be written and the invocation
    /// aborted rather than risk silent data loss.
    pub async fn run(&self, request: &ExtractionRequest) -> Result<RunReport, HarvestError> {
        let guard = TimeBudgetGuard::new(self.clock.clone(), self.budget);
        let keys = StorageKeys::derive(
            &request.country_name,
            request.flow,
            request.start_year,
            request.end_year,
        );
        let grid = TaskGrid::new(
            request.reporter_code,
            request.start_year,
            request.end_year,
            self.partners.clone(),
        );

        let store = self.store.as_ref();
        let mut progress = ProgressState::load(store, &keys.progress).await?;
        let mut archive = ResultArchive::load(store, &keys.results).await?;
        let mut pacing = RetryPacing::new();
        let mut counters = RunCounters::default();

        info!(
            country = %request.country_name,
            direction = request.flow.label(),
            start_year = request.start_year,
            end_year = request.end_year,
            already_completed = progress.completed_count(),
            total_tasks = grid.len(),
            "starting extraction run"
        );

        for task in grid.iter() {
            // Skips touch neither the remote nor the store.
            if progress.should_skip_before_cursor(task, &grid) || progress.is_completed(task) {
                counters.skipped += 1;
                continue;
            }

            // Attempt loop: leaves only on success, quota exhaustion, or an
            // expired budget. The budget is re-checked before every attempt
            // because retries and their sleeps consume it too.
            loop {
                if guard.expired() {
                    archive.save(store, &keys.results).await?;
                    progress.save(store, &keys.progress).await?;
                    warn!(
                        elapsed_secs = guard.elapsed().as_secs(),
                        completed = counters.completed,
                        "time budget hit, results and progress saved"
                    );
                    return Ok(RunReport::time_exceeded(progress.cursor(), counters));
                }

                match self.fetcher.fetch(task).await {
                    FetchOutcome::Success(records) => {
                        if records.is_empty() {
                            counters.empty += 1;
                            debug!(%task, "no data");
                        } else {
                            counters.records += records.len();
                            debug!(%task, count = records.len(), "records collected");
                        }
                        archive.append(records);
                        progress.record_completion(task);
                        // Results land before progress: a crash between the
                        // two writes re-fetches one task rather than losing
                        // its records.
                        archive.save(store, &keys.results).await?;
                        progress.save(store, &keys.progress).await?;
                        pacing.after_success();
                        counters.completed += 1;
                        break;
                    }
                    FetchOutcome::TransientFailure(detail) => {
                        counters.retries += 1;
                        let delay = pacing.after_failure();
                        warn!(%task, detail, delay_secs = delay.as_secs(), "transient failure, backing off");
                        tokio::time::sleep(delay).await;
                    }
                    FetchOutcome::QuotaExhausted(detail) => {
                        // The in-flight task is the resume point and stays
                        // out of the completed set so the next run retries it.
                        progress.mark_resume_point(task);
                        archive.save(store, &keys.results).await?;
                        progress.save(store, &keys.progress).await?;
                        warn!(%task, detail, "remote quota exhausted, stopping run");
                        return Ok(RunReport::quota_exhausted(task, counters));
                    }
                }
            }
        }

        progress.clear_cursor();
        archive.save(store, &keys.results).await?;
        progress.save(store, &keys.progress).await?;
        info!(
            records = archive.len(),
            completed = counters.completed,
            skipped = counters.skipped,
            "all tasks fetched and saved"
        );
        Ok(RunReport::completed(counters))
    }
}
