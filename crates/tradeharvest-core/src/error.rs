use thiserror::Error;

use crate::ports::blob_store::StoreError;

/// Faults that abort an invocation.
///
/// Remote-call failures never appear here: the runner absorbs transient ones
/// and reports quota exhaustion as a run status. What does appear is anything
/// that would make a checkpoint unreliable; the run must not continue past a
/// checkpoint it could not write.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("blob store: {0}")]
    Store(#[from] StoreError),

    #[error("blob codec: {0}")]
    Codec(#[from] serde_json::Error),
}
