//! Example that caches both MTA-KDD-19 feature sets and prints the combined shape
//!
//! Run this example with:
//! ```
//! cargo run --example load_dataset
//! ```

use mta_kdd::{
    ConsoleReporter, DatasetLoader, DatasetSummary, FetchConfig, Fetcher, IntoFetchCallback,
    LoaderConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // No tracing subscriber; the reporter is the only output
    let config = LoaderConfig::default();
    let fetcher = Fetcher::new(FetchConfig::default())?
        .with_callback(ConsoleReporter.into_callback());

    let dataset = DatasetLoader::with_fetcher(config, fetcher).load().await?;

    print!("{}", DatasetSummary::from_frame(&dataset));
    Ok(())
}
