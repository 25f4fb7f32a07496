//! CLI argument definitions for coinwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `add` | Add a symbol to the watch-list |
//! | `remove` | Remove a symbol and its samples |
//! | `active` | List watched symbols |
//! | `price` | Resolve a price at or nearest to a timestamp |
//! | `run` | Run the sampling daemon in the foreground |
//!
//! # Examples
//!
//! ```bash
//! # Start watching bitcoin
//! coinwatch add bitcoin
//!
//! # What was it worth at a point in time?
//! coinwatch price bitcoin 1736500490
//!
//! # Run the sampler until Ctrl-C
//! coinwatch run
//! ```

use clap::{Parser, Subcommand};

/// Watch-list price tracker over the CoinGecko simple-price API.
#[derive(Debug, Parser)]
#[command(
    name = "coinwatch",
    author,
    version,
    about = "Track crypto symbols and query their sampled USD prices"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a symbol to the watch-list (reactivates it if already known).
    Add {
        /// Quote source identifier, e.g. "bitcoin".
        symbol: String,
    },

    /// Remove a symbol and delete every sample recorded for it.
    Remove {
        /// Symbol to stop tracking.
        symbol: String,
    },

    /// List the symbols currently being sampled.
    Active,

    /// Resolve a symbol's price at (or nearest to) a unix timestamp.
    Price {
        /// Symbol to look up.
        symbol: String,
        /// Unix timestamp in seconds.
        timestamp: i64,
    },

    /// Run the periodic sampling daemon until Ctrl-C.
    Run,
}
