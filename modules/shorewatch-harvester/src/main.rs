use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shorewatch_common::Config;
use shorewatch_harvester::fetch::HttpFetcher;
use shorewatch_harvester::pipeline::Harvester;
use shorewatch_harvester::store::PgCacheStore;

#[derive(Parser)]
#[command(
    name = "harvester",
    about = "Scrape the mile-watch table into the cached feature collection"
)]
struct Cli {
    /// Run a single harvest and exit instead of looping on the interval.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shorewatch=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    info!("Shorewatch harvester starting...");

    let store = Arc::new(PgCacheStore::connect(&config.database_url).await?);
    let fetcher = Arc::new(HttpFetcher::new());
    let harvester = Harvester::new(fetcher, store, &config);

    if cli.once {
        let stats = harvester.run().await?;
        info!("Harvest complete. {stats}");
        return Ok(());
    }

    let mut ticker = interval(Duration::from_secs(config.harvest_interval_hours * 3600));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match harvester.run().await {
            Ok(stats) => info!("Harvest complete. {stats}"),
            // The previous collection keeps serving; alerting watches the logs.
            Err(e) => error!(error = %e, "Harvest run failed"),
        }
    }
}
