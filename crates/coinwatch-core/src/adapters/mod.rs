//! Quote source adapters.

mod coingecko;

pub use coingecko::{CoinGeckoSource, COINGECKO_BASE_URL};
