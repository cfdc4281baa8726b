//! Storage key derivation for the result and progress blobs.

use crate::domain::TradeFlow;

/// The two blob keys for one extraction.
///
/// Derivation must be stable across runs: resume only works if a
/// re-invocation computes exactly the same keys as the run it continues.
/// Both keys carry the full (country, direction, year-range) identity, so a
/// different year range owns a fresh progress/result pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub results: String,
    pub progress: String,
}

impl StorageKeys {
    pub fn derive(country_name: &str, flow: TradeFlow, start_year: i32, end_year: i32) -> Self {
        let slug = slugify(country_name);
        let label = flow.label();
        Self {
            results: format!("results/{slug}_{label}_{start_year}to{end_year}.json"),
            progress: format!("progress/{slug}_{label}_{start_year}to{end_year}_progress.json"),
        }
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
