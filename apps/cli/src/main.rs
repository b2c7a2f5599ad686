//! Command-line front end: cache the MTA-KDD-19 feature sets and summarise them

use anyhow::Context;
use clap::Parser;
use mta_kdd::{DatasetLoader, DatasetSummary, LoaderConfig, DEFAULT_BASE_URL, DEFAULT_DATA_DIR};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "mta-kdd", version, about = "Fetch, cache and load the MTA-KDD-19 datasets")]
struct Args {
    /// Mirror prefix the dataset file names are appended to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory holding the cached CSV files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = LoaderConfig::default()
        .with_base_url(args.base_url)
        .with_data_dir(args.data_dir);

    // Fetch progress is reported through the subscriber only
    let dataset = DatasetLoader::new(config)
        .load()
        .await
        .context("loading combined dataset")?;

    let summary = DatasetSummary::from_frame(&dataset);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}
