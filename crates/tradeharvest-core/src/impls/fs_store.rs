//! Filesystem blob store: keys become paths under a root directory.
//!
//! Stands in for the object store the engine runs against in production;
//! the port is the seam where an S3-shaped adapter would plug in instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::blob_store::{BlobStore, StoreError};

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys use '/' as a namespace separator ("progress/...json"); map
        // them straight onto subdirectories.
        self.root.join(Path::new(key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, bytes).await?;
        Ok(())
    }
}
