//! Point-in-time price query.

use coinwatch_core::PriceLookup;

use crate::commands::{open_store, render_json};
use crate::config::Config;
use crate::error::CliError;

pub fn at(config: &Config, symbol: &str, timestamp: i64, pretty: bool) -> Result<(), CliError> {
    let lookup = PriceLookup::new(open_store(config)?);
    let point = lookup.at(symbol, timestamp)?;
    render_json(&point, pretty)
}
