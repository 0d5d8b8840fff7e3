// ABOUTME: CLI entry point wiring configuration, client, store, and sync loop
// ABOUTME: Thin orchestration only; all pipeline logic lives in the library
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Garmin Sync Binary
//!
//! Backfills the configured number of days (today first) from Garmin Connect
//! into Supabase. Configuration comes from the environment; `--days`
//! overrides the backfill window.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use garmin_health_sync::{
    config::SyncConfig,
    fetch::{Fetcher, RetryPolicy},
    logging,
    providers::GarminClient,
    store::SupabaseStore,
    sync::HealthSync,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "garmin-sync")]
#[command(about = "Sync daily Garmin Connect health metrics into Supabase")]
struct Args {
    /// Number of days to backfill, today included
    #[arg(long)]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env();

    let config = SyncConfig::from_env()?;
    let days = args.days.unwrap_or(config.days_to_sync);
    info!("starting Garmin sync: {}", config.summary());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let provider = GarminClient::new(config.garmin.clone(), client.clone());
    let store = SupabaseStore::new(config.supabase.clone(), client);
    let sync = HealthSync::new(
        provider,
        store,
        Fetcher::new(RetryPolicy::default()),
        config.user_id,
        Duration::from_secs(config.day_pause_secs),
    );

    sync.run(days).await?;
    info!("sync complete");
    Ok(())
}
