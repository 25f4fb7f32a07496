//! Watch-list commands.

use coinwatch_core::Watchlist;

use crate::commands::{open_store, render_json};
use crate::config::Config;
use crate::error::CliError;

pub fn add(config: &Config, symbol: &str) -> Result<(), CliError> {
    let watchlist = Watchlist::new(open_store(config)?);
    let symbol = watchlist.add(symbol)?;
    println!("added '{symbol}' to the watch-list");
    Ok(())
}

pub fn remove(config: &Config, symbol: &str) -> Result<(), CliError> {
    let watchlist = Watchlist::new(open_store(config)?);
    let symbol = watchlist.remove(symbol)?;
    println!("removed '{symbol}' and its samples");
    Ok(())
}

pub fn active(config: &Config, pretty: bool) -> Result<(), CliError> {
    let watchlist = Watchlist::new(open_store(config)?);
    let symbols: Vec<String> = watchlist
        .active()?
        .into_iter()
        .map(|asset| asset.symbol.to_string())
        .collect();
    render_json(&symbols, pretty)
}
