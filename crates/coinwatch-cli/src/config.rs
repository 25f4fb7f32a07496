//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use coinwatch_core::{StoreConfig, COINGECKO_BASE_URL};
use tracing::warn;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Runtime configuration assembled from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store location and pooling.
    pub store: StoreConfig,
    /// Seconds between ingestion cycles.
    pub poll_interval: Duration,
    /// Quote API root.
    pub coingecko_url: String,
    /// Optional demo API key sent with every quote request.
    pub coingecko_api_key: Option<String>,
}

impl Config {
    /// Read configuration from the environment, applying defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `COINWATCH_HOME` | `$HOME/.coinwatch` |
    /// | `COINWATCH_DB` | `<home>/coinwatch.duckdb` |
    /// | `COINWATCH_POLL_INTERVAL` | `30` (seconds) |
    /// | `COINWATCH_COINGECKO_URL` | public CoinGecko API root |
    /// | `COINWATCH_COINGECKO_API_KEY` | unset |
    pub fn from_env() -> Self {
        let mut store = StoreConfig::default();
        if let Some(db) = env::var_os("COINWATCH_DB") {
            if !db.is_empty() {
                store.db_path = PathBuf::from(db);
            }
        }

        let poll_interval = match env::var("COINWATCH_POLL_INTERVAL") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "invalid COINWATCH_POLL_INTERVAL, using default");
                    Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let coingecko_url = env::var("COINWATCH_COINGECKO_URL")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| String::from(COINGECKO_BASE_URL));

        let coingecko_api_key = env::var("COINWATCH_COINGECKO_API_KEY")
            .ok()
            .filter(|value| !value.is_empty());

        Self {
            store,
            poll_interval,
            coingecko_url,
            coingecko_api_key,
        }
    }
}
