//! Progress checkpoint: what is done, and where to pick up.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::ports::blob_store::{BlobStore, StoreError};

use super::grid::TaskGrid;
use super::task::FetchTask;

/// Durable record of extraction progress for one (country, direction,
/// year-range) key pair.
///
/// Two signals, written together in every checkpoint so they can never
/// disagree at a durable point:
/// - `completed`: per-year sets of partner codes whose fetch landed;
/// - `cursor`: the last task processed. After a quota exit it points at the
///   in-flight task, which is deliberately NOT in `completed`, so the next
///   invocation retries it.
///
/// All transitions go through methods; nothing outside this type pokes the
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    completed: BTreeMap<i32, BTreeSet<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<FetchTask>,

    /// Stamp of the last durable write. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

impl ProgressState {
    /// Load from the store. A missing key is the normal first-run condition
    /// and yields an empty state; any other store or decode failure is a
    /// fault.
    pub async fn load(store: &dyn BlobStore, key: &str) -> Result<Self, HarvestError> {
        match store.get(key).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(StoreError::NotFound(_)) => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist synchronously. Called after every state change whose loss
    /// would cause already-fetched data to be fetched again.
    pub async fn save(&mut self, store: &dyn BlobStore, key: &str) -> Result<(), HarvestError> {
        self.saved_at = Some(Utc::now());
        let bytes = serde_json::to_vec(self)?;
        store.put(key, bytes).await?;
        Ok(())
    }

    pub fn is_completed(&self, task: FetchTask) -> bool {
        self.completed
            .get(&task.year)
            .is_some_and(|partners| partners.contains(&task.partner_code))
    }

    /// Resume-skip predicate: true while `task` sorts strictly before the
    /// cursor in grid order. The first task at-or-after the cursor consumes
    /// it, after which tasks are judged by `is_completed` alone. A cursor the
    /// grid cannot address (say, the year range changed between runs) is
    /// consumed immediately rather than skipping work it should not.
    pub fn should_skip_before_cursor(&mut self, task: FetchTask, grid: &TaskGrid) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        if grid.precedes(task, cursor) {
            true
        } else {
            self.cursor = None;
            false
        }
    }

    /// Record a finished fetch and move the cursor onto it. Both signals
    /// change together; the caller checkpoints immediately after.
    pub fn record_completion(&mut self, task: FetchTask) {
        self.completed
            .entry(task.year)
            .or_default()
            .insert(task.partner_code);
        self.cursor = Some(task);
    }

    /// Point the cursor at a task WITHOUT recording completion: the
    /// quota-exit path, where the in-flight task must be retried next run.
    pub fn mark_resume_point(&mut self, task: FetchTask) {
        self.cursor = Some(task);
    }

    /// Drop the resume point on full completion.
    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<FetchTask> {
        self.cursor
    }

    pub fn completed_count(&self) -> usize {
        self.completed.values().map(BTreeSet::len).sum()
    }

    pub fn completed_in_year(&self, year: i32) -> Option<&BTreeSet<u32>> {
        self.completed.get(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::memory_store::MemoryBlobStore;

    fn grid() -> TaskGrid {
        TaskGrid::new(1, 2020, 2021, vec![12, 4, 8])
    }

    #[test]
    fn completion_updates_both_signals() {
        let mut state = ProgressState::default();
        let task = FetchTask::new(2020, 4);

        assert!(!state.is_completed(task));
        state.record_completion(task);

        assert!(state.is_completed(task));
        assert_eq!(state.cursor(), Some(task));
        assert_eq!(state.completed_count(), 1);
    }

    #[test]
    fn skips_strictly_before_cursor_then_consumes_it() {
        let grid = grid();
        let mut state = ProgressState::default();
        state.mark_resume_point(FetchTask::new(2020, 8));

        assert!(state.should_skip_before_cursor(FetchTask::new(2020, 12), &grid));
        assert!(state.should_skip_before_cursor(FetchTask::new(2020, 4), &grid));

        // The cursor task itself is at-or-after: consumed, not skipped.
        assert!(!state.should_skip_before_cursor(FetchTask::new(2020, 8), &grid));
        assert_eq!(state.cursor(), None);

        // Later tasks no longer consult the cursor.
        assert!(!state.should_skip_before_cursor(FetchTask::new(2020, 12), &grid));
    }

    #[test]
    fn no_cursor_means_no_skipping() {
        let mut state = ProgressState::default();
        assert!(!state.should_skip_before_cursor(FetchTask::new(2020, 12), &grid()));
    }

    #[test]
    fn dangling_cursor_is_consumed_immediately() {
        let mut state = ProgressState::default();
        state.mark_resume_point(FetchTask::new(1999, 4));

        assert!(!state.should_skip_before_cursor(FetchTask::new(2020, 12), &grid()));
        assert_eq!(state.cursor(), None);
    }

    #[test]
    fn mark_resume_point_does_not_complete() {
        let mut state = ProgressState::default();
        let task = FetchTask::new(2020, 8);
        state.mark_resume_point(task);

        assert_eq!(state.cursor(), Some(task));
        assert!(!state.is_completed(task));
    }

    #[tokio::test]
    async fn load_of_missing_key_is_empty_state() {
        let store = MemoryBlobStore::new();
        let state = ProgressState::load(&store, "progress/missing.json")
            .await
            .unwrap();
        assert_eq!(state, ProgressState::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryBlobStore::new();
        let key = "progress/p.json";

        let mut state = ProgressState::default();
        state.record_completion(FetchTask::new(2020, 4));
        state.record_completion(FetchTask::new(2020, 8));
        state.save(&store, key).await.unwrap();

        let loaded = ProgressState::load(&store, key).await.unwrap();
        assert!(loaded.is_completed(FetchTask::new(2020, 4)));
        assert!(loaded.is_completed(FetchTask::new(2020, 8)));
        assert_eq!(loaded.cursor(), Some(FetchTask::new(2020, 8)));
        assert!(loaded.saved_at.is_some());
    }

    #[tokio::test]
    async fn corrupt_blob_is_a_fault_not_an_empty_state() {
        let store = MemoryBlobStore::new();
        store
            .put("progress/p.json", b"not json".to_vec())
            .await
            .unwrap();
        let err = ProgressState::load(&store, "progress/p.json").await;
        assert!(matches!(err, Err(HarvestError::Codec(_))));
    }

    #[test]
    fn years_serialize_as_object_keys() {
        let mut state = ProgressState::default();
        state.record_completion(FetchTask::new(2020, 4));
        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v["completed"]["2020"], serde_json::json!([4]));
        assert_eq!(v["cursor"]["partner_code"], 4);
    }
}
