//! Watch Sync - marketplace stock & price synchronization
//!
//! Downloads the supplier stock feed and updates stocks and prices on Ozon
//! and on both Yandex Market campaigns, strictly one after another.

use clap::{Parser, ValueEnum};
use watch_sync::api::{market, ozon};
use watch_sync::{feed, MarketApi, MarketConfig, OzonApi, OzonConfig, Result, SyncError};

/// Marketplace stock & price sync for the watch shop
#[derive(Parser, Debug)]
#[command(name = "watch_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Which marketplace(s) to synchronize
    #[arg(long, value_enum, default_value_t = Target::All)]
    target: Target,

    /// Supplier feed URL
    #[arg(long, default_value = feed::FEED_URL)]
    feed_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    All,
    Ozon,
    Market,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        report(&e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    // Read credentials up front so a missing variable fails before any
    // network call is made.
    let ozon_config = match args.target {
        Target::All | Target::Ozon => Some(OzonConfig::from_env()?),
        Target::Market => None,
    };
    let market_config = match args.target {
        Target::All | Target::Market => Some(MarketConfig::from_env()?),
        Target::Ozon => None,
    };

    let rows = feed::download_feed(&args.feed_url)?;

    if let Some(config) = &ozon_config {
        let api = OzonApi::new(config);
        ozon::sync(&api, &rows)?;
    }

    if let Some(config) = &market_config {
        let api = MarketApi::new(config);
        let campaigns = [
            ("FBS", &config.fbs_campaign_id, &config.fbs_warehouse_id),
            ("DBS", &config.dbs_campaign_id, &config.dbs_warehouse_id),
        ];
        for (label, campaign_id, warehouse_id) in campaigns {
            log::info!("Synchronizing Yandex Market {} campaign", label);
            market::sync_campaign(&api, campaign_id, warehouse_id, &rows)?;
        }
    }

    log::info!("Sync completed successfully.");
    Ok(())
}

/// Top-level failure reporting: timeouts, connection failures and everything
/// else get their own message; no retries, no partial-success bookkeeping.
fn report(error: &SyncError) {
    match error {
        SyncError::Network(e) if e.is_timeout() => {
            log::error!("Request timed out");
        }
        SyncError::Network(e) if e.is_connect() => {
            log::error!("Connection failed: {}", e);
        }
        other => {
            log::error!("Sync failed: {}", other);
        }
    }
}
