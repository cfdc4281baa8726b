//! Ports: the seams where the engine meets the outside world.
//!
//! Each trait has a production adapter in `impls` and a cheap in-process
//! double for tests; the runner only ever sees the trait.

pub mod blob_store;
pub mod clock;
pub mod fetcher;

pub use blob_store::{BlobStore, StoreError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use fetcher::TradeFetcher;
