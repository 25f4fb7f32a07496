//! Command dispatch.

mod daemon;
mod price;
mod watch;

use std::sync::Arc;

use coinwatch_core::{PriceDb, PriceStore};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Add { symbol } => watch::add(&Config::from_env(), symbol),
        Command::Remove { symbol } => watch::remove(&Config::from_env(), symbol),
        Command::Active => watch::active(&Config::from_env(), cli.pretty),
        Command::Price { symbol, timestamp } => {
            price::at(&Config::from_env(), symbol, *timestamp, cli.pretty)
        }
        Command::Run => daemon::run().await,
    }
}

/// Open the durable store described by the configuration.
///
/// Failure here is the one fatal path in the binary.
pub(crate) fn open_store(config: &Config) -> Result<Arc<dyn PriceStore>, CliError> {
    let store = PriceDb::open(config.store.clone())?;
    Ok(Arc::new(store))
}

pub(crate) fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
