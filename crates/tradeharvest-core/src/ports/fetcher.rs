//! TradeFetcher port: one classified remote query per task.

use async_trait::async_trait;

use crate::domain::{FetchOutcome, FetchTask};

/// Issues a single remote query for a task and classifies what came back.
///
/// Implementations never retry and never sleep; pacing belongs to the
/// runner. This trait is the seam for swapping the real HTTP adapter with a
/// scripted double in tests.
#[async_trait]
pub trait TradeFetcher: Send + Sync {
    async fn fetch(&self, task: FetchTask) -> FetchOutcome;
}
