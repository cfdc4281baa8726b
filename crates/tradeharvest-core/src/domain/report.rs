//! Run report: the structured terminal status of one invocation.

use serde::{Deserialize, Serialize};

use super::task::FetchTask;

/// How an invocation ended.
///
/// Partial endings are expected, designed conditions, not errors; the caller
/// (whatever re-invokes the engine) reads the status to decide whether and
/// when to run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every task in the grid is recorded complete.
    Completed,

    /// The time budget ran out; re-invoke to continue.
    TimeExceeded,

    /// The remote refused further calls for this credential.
    QuotaExhausted,
}

impl RunStatus {
    /// HTTP-flavored status code used on the invocation boundary.
    pub fn code(self) -> u16 {
        match self {
            RunStatus::Completed => 200,
            RunStatus::TimeExceeded => 206,
            RunStatus::QuotaExhausted => 403,
        }
    }
}

/// Work accounting for one invocation, for logs and the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Tasks fetched and recorded complete this run.
    pub completed: usize,

    /// Tasks skipped because a previous run already covered them.
    pub skipped: usize,

    /// Completed tasks whose response carried no records.
    pub empty: usize,

    /// Transient failures absorbed by the retry loop.
    pub retries: usize,

    /// Records appended to the archive this run.
    pub records: usize,
}

/// The invocation result surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub status_code: u16,
    pub message: String,

    /// Where the next invocation picks up; absent on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_cursor: Option<FetchTask>,

    pub counters: RunCounters,
}

impl RunReport {
    pub fn completed(counters: RunCounters) -> Self {
        Self {
            status: RunStatus::Completed,
            status_code: RunStatus::Completed.code(),
            message: "Download complete.".to_string(),
            resume_cursor: None,
            counters,
        }
    }

    pub fn time_exceeded(resume_cursor: Option<FetchTask>, counters: RunCounters) -> Self {
        Self {
            status: RunStatus::TimeExceeded,
            status_code: RunStatus::TimeExceeded.code(),
            message: "Partial run complete. Re-invoke to continue.".to_string(),
            resume_cursor,
            counters,
        }
    }

    pub fn quota_exhausted(resume_cursor: FetchTask, counters: RunCounters) -> Self {
        Self {
            status: RunStatus::QuotaExhausted,
            status_code: RunStatus::QuotaExhausted.code(),
            message: "Remote quota exhausted. Re-invoke once the quota resets.".to_string(),
            resume_cursor: Some(resume_cursor),
            counters,
        }
    }
}
