//! tradeharvest-core
//!
//! Core building blocks for the tradeharvest extraction engine.
//!
//! # Module layout
//! - **domain**: value types and checkpoint state (task, grid, flow, progress, outcome, report)
//! - **ports**: abstraction seams (BlobStore, TradeFetcher, Clock)
//! - **app**: the engine itself (runner, time budget, pacing, storage keys)
//! - **impls**: adapters (in-memory store, filesystem store, Comtrade HTTP fetcher)

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use error::HarvestError;
