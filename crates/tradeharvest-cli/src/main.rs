//! tradeharvest: one invocation of the extraction engine from the shell.
//!
//! Prints the run report as JSON on stdout. Partial statuses (206, 403) are
//! normal results, not failures; re-invoke with the same arguments to
//! continue where the run left off.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tradeharvest_core::app::{ExtractionRequest, ExtractionRunner};
use tradeharvest_core::domain::{CountryDirectory, TradeFlow};
use tradeharvest_core::impls::{ComtradeFetcher, FsBlobStore};
use tradeharvest_core::ports::blob_store::BlobStore;

#[derive(Parser, Debug)]
#[command(name = "tradeharvest")]
#[command(about = "Resumable bulk extraction of trade-flow records")]
struct Cli {
    /// Numeric M49 code of the reporting country.
    #[arg(long)]
    reporter: u32,

    /// Trade regime: 1 = imports, anything else = exports.
    #[arg(long, default_value_t = 1)]
    regime: i64,

    /// First year to fetch (inclusive).
    #[arg(long)]
    start_year: i32,

    /// Last year to fetch (inclusive).
    #[arg(long)]
    end_year: i32,

    /// Root directory of the blob store.
    #[arg(long, env = "TRADEHARVEST_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Subscription key for the remote API.
    #[arg(long, env = "COMTRADE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Store key of the country-codes reference blob.
    #[arg(
        long,
        env = "TRADEHARVEST_COUNTRY_CODES_KEY",
        default_value = "reference/country_codes.json"
    )]
    country_codes_key: String,

    /// Wall-clock budget for this invocation, in seconds.
    #[arg(long, default_value_t = 750)]
    budget_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let flow = TradeFlow::from_regime(cli.regime);

    tracing::info!(data_dir = %cli.data_dir.display(), "using local blob store");
    let store = Arc::new(FsBlobStore::new(&cli.data_dir));

    let directory = load_directory(store.as_ref(), &cli.country_codes_key).await?;
    let country_name = directory.name_for(cli.reporter).to_string();

    let fetcher = ComtradeFetcher::new(cli.reporter, flow, cli.api_key.as_str())
        .context("building HTTP client")?;

    let runner = ExtractionRunner::new(store, Arc::new(fetcher))
        .with_budget(Duration::from_secs(cli.budget_secs));

    let request = ExtractionRequest {
        reporter_code: cli.reporter,
        flow,
        start_year: cli.start_year,
        end_year: cli.end_year,
        country_name,
    };

    let report = runner
        .run(&request)
        .await
        .context("extraction run aborted")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn load_directory(store: &dyn BlobStore, key: &str) -> anyhow::Result<CountryDirectory> {
    let bytes = store
        .get(key)
        .await
        .with_context(|| format!("reading country directory blob {key}"))?;
    CountryDirectory::from_json_bytes(&bytes)
        .with_context(|| format!("decoding country directory blob {key}"))
}
