//! BlobStore port: durable get/put of opaque byte blobs by key.
//!
//! Progress and result blobs both live behind this trait. The engine treats
//! the store as a single-writer resource per key: no two invocations may
//! write the same key concurrently.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Expected on the first run for a key; callers that can start empty
    /// match on this variant instead of failing.
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable key/value blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Overwrites any existing blob at `key`. The write must be durable when
    /// this returns: a checkpoint that did not land is a fatal condition for
    /// the invocation.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}
