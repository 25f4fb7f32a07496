//! Foreground sampling daemon.

use std::sync::Arc;

use coinwatch_core::{CoinGeckoSource, ReqwestHttpClient, Sampler};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::open_store;
use crate::config::Config;
use crate::error::CliError;

/// Run the sampler until Ctrl-C, then stop at the next safe boundary.
pub async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let store = open_store(&config)?;

    let mut source = CoinGeckoSource::new(Arc::new(ReqwestHttpClient::new()))
        .with_base_url(config.coingecko_url.as_str());
    if let Some(api_key) = &config.coingecko_api_key {
        source = source.with_api_key(api_key.as_str());
    }

    let sampler = Sampler::new(store, Arc::new(source), config.poll_interval);
    let (stop_tx, stop_rx) = watch::channel(false);
    let sampler_task = tokio::spawn(sampler.run(stop_rx));

    info!(
        db = %config.store.db_path.display(),
        interval_secs = config.poll_interval.as_secs(),
        "coinwatch daemon running, Ctrl-C to stop"
    );
    tokio::signal::ctrl_c().await?;

    let _ = stop_tx.send(true);
    sampler_task
        .await
        .map_err(|error| CliError::Command(format!("sampler task failed: {error}")))?;

    info!("daemon stopped");
    Ok(())
}
