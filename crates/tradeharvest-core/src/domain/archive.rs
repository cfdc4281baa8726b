//! Result archive: the accumulated remote records, stored as one JSON array.

use serde_json::Value;

use crate::error::HarvestError;
use crate::ports::blob_store::{BlobStore, StoreError};

/// Append-only sequence of opaque remote records.
///
/// Records pass through untouched; nothing here inspects or deduplicates
/// them. Duplicate protection comes from never re-fetching a completed task,
/// not from content comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultArchive {
    records: Vec<Value>,
}

impl ResultArchive {
    /// Load the archive; a missing key is an empty archive.
    pub async fn load(store: &dyn BlobStore, key: &str) -> Result<Self, HarvestError> {
        match store.get(key).await {
            Ok(bytes) => Ok(Self {
                records: serde_json::from_slice(&bytes)?,
            }),
            Err(StoreError::NotFound(_)) => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save(&self, store: &dyn BlobStore, key: &str) -> Result<(), HarvestError> {
        let bytes = serde_json::to_vec(&self.records)?;
        store.put(key, bytes).await?;
        Ok(())
    }

    pub fn append(&mut self, records: Vec<Value>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
