//! Outcome model: the classified result of one remote fetch attempt.
//!
//! The fetch adapter does the classifying; it never retries. Retry policy
//! lives in the runner, because only the runner knows how much of the time
//! budget is left.

use serde_json::Value;

/// A unified classification of a fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The remote answered; the record list may be empty. An empty answer is
    /// a completed task, not a failure.
    Success(Vec<Value>),

    /// Anything worth retrying after a pause: network error, timeout,
    /// non-quota HTTP status, undecodable body.
    TransientFailure(String),

    /// The remote rejected the credential for the rest of this run
    /// (HTTP 403). No further calls may be issued this invocation.
    QuotaExhausted(String),
}

impl FetchOutcome {
    pub fn success(records: Vec<Value>) -> Self {
        FetchOutcome::Success(records)
    }

    pub fn transient(detail: impl Into<String>) -> Self {
        FetchOutcome::TransientFailure(detail.into())
    }

    pub fn quota_exhausted(detail: impl Into<String>) -> Self {
        FetchOutcome::QuotaExhausted(detail.into())
    }

    /// Terminal for the whole invocation, not just this task.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchOutcome::QuotaExhausted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_quota_is_terminal() {
        assert!(FetchOutcome::quota_exhausted("403").is_terminal());
        assert!(!FetchOutcome::transient("timeout").is_terminal());
        assert!(!FetchOutcome::success(vec![]).is_terminal());
    }

    #[test]
    fn constructors_take_anything_stringy() {
        let o = FetchOutcome::transient(String::from("boom"));
        assert_eq!(o, FetchOutcome::TransientFailure("boom".into()));
    }
}
